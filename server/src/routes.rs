//! Handlers for `/api/todos`.
//!
//! Each handler validates its body (in `ValidJson`), locates the caller's
//! list, optionally the nested item, then mutates and returns the whole
//! list. Ids that do not parse as UUIDs cannot name anything the caller owns
//! and are reported as not found.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::Owner,
    error::AppError,
    models::{CreateItem, ListName, TodoList, UpdateItem},
    validate::ValidJson,
    AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/{id}/items", post(add_item))
        .route("/{id}/items/{item_id}", put(update_item).delete(delete_item))
}

/// `GET` and `POST` on the list collection. Also mounted at `/api/todos/`,
/// which nesting alone does not match.
pub fn collection() -> MethodRouter<AppState> {
    get(list_todos).post(create_todo)
}

fn parse_id(raw: &str) -> Option<Uuid> {
    raw.parse().ok()
}

async fn list_todos(State(state): State<AppState>, Owner(owner): Owner) -> Json<Vec<TodoList>> {
    Json(state.store.find(owner).await)
}

async fn create_todo(
    State(state): State<AppState>,
    Owner(owner): Owner,
    ValidJson(input): ValidJson<ListName>,
) -> Result<(StatusCode, Json<TodoList>), AppError> {
    let list = state.store.save(TodoList::new(owner, input.name)).await?;
    info!(list = %list.id, %owner, "created todo list");
    Ok((StatusCode::CREATED, Json(list)))
}

async fn get_todo(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<TodoList>, AppError> {
    let id = parse_id(&id).ok_or_else(AppError::list_not_found)?;
    state
        .store
        .find_one(owner, id)
        .await
        .map(Json)
        .ok_or_else(AppError::list_not_found)
}

async fn update_todo(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<ListName>,
) -> Result<Json<TodoList>, AppError> {
    let id = parse_id(&id).ok_or_else(AppError::list_not_found)?;
    state
        .store
        .find_one_and_update(owner, id, |list| -> Result<(), AppError> {
            list.name = input.name;
            Ok(())
        })
        .await?
        .map(Json)
        .ok_or_else(AppError::list_not_found)
}

async fn delete_todo(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id).ok_or_else(AppError::list_not_found)?;
    let removed = state
        .store
        .find_one_and_delete(owner, id)
        .await?
        .ok_or_else(AppError::list_not_found)?;
    info!(list = %removed.id, items = removed.items.len(), "deleted todo list");
    Ok(Json(MessageResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}

async fn add_item(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<CreateItem>,
) -> Result<Json<TodoList>, AppError> {
    let id = parse_id(&id).ok_or_else(AppError::list_not_found)?;
    state
        .store
        .find_one_and_update(owner, id, |list| -> Result<(), AppError> {
            list.push_item(input.text);
            Ok(())
        })
        .await?
        .map(Json)
        .ok_or_else(AppError::list_not_found)
}

async fn update_item(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path((id, item_id)): Path<(String, String)>,
    ValidJson(patch): ValidJson<UpdateItem>,
) -> Result<Json<TodoList>, AppError> {
    let id = parse_id(&id).ok_or_else(AppError::list_not_found)?;
    let item_id = parse_id(&item_id);
    state
        .store
        .find_one_and_update(owner, id, |list| -> Result<(), AppError> {
            let item = item_id
                .and_then(|item_id| list.item_mut(item_id))
                .ok_or_else(AppError::item_not_found)?;
            patch.apply(item);
            Ok(())
        })
        .await?
        .map(Json)
        .ok_or_else(AppError::list_not_found)
}

async fn delete_item(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<TodoList>, AppError> {
    let id = parse_id(&id).ok_or_else(AppError::list_not_found)?;
    let item_id = parse_id(&item_id);
    state
        .store
        .find_one_and_update(owner, id, |list| -> Result<(), AppError> {
            item_id
                .and_then(|item_id| list.remove_item(item_id))
                .map(|_| ())
                .ok_or_else(AppError::item_not_found)
        })
        .await?
        .map(Json)
        .ok_or_else(AppError::list_not_found)
}
