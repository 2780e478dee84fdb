//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the API root and the caller's bearer token, and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the round-trip.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateItem, Message, TodoList, TodoName, UpdateItem};

const TODOS_ROOT: &str = "/api/todos";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    token: Option<String>,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, String::new(), None)
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/{id}"), None)
    }

    pub fn build_create_todo(&self, input: &TodoName) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Post, String::new(), Some(to_body(input)?)))
    }

    pub fn build_rename_todo(&self, id: Uuid, input: &TodoName) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Put, format!("/{id}"), Some(to_body(input)?)))
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/{id}"), None)
    }

    pub fn build_add_item(&self, id: Uuid, input: &CreateItem) -> Result<HttpRequest, ApiError> {
        Ok(self.request(HttpMethod::Post, format!("/{id}/items"), Some(to_body(input)?)))
    }

    pub fn build_update_item(
        &self,
        id: Uuid,
        item_id: Uuid,
        input: &UpdateItem,
    ) -> Result<HttpRequest, ApiError> {
        Ok(self.request(
            HttpMethod::Put,
            format!("/{id}/items/{item_id}"),
            Some(to_body(input)?),
        ))
    }

    pub fn build_delete_item(&self, id: Uuid, item_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/{id}/items/{item_id}"), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<TodoList>, ApiError> {
        parse(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        parse(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        parse(response, 201)
    }

    pub fn parse_rename_todo(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        parse(response, 200)
    }

    /// Returns the server's confirmation message.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse::<Message>(response, 200).map(|m| m.message)
    }

    pub fn parse_add_item(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        parse(response, 200)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        parse(response, 200)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        parse(response, 200)
    }

    fn request(&self, method: HttpMethod, suffix: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}{TODOS_ROOT}{suffix}", self.base_url),
            headers,
            body,
        }
    }
}

fn to_body<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn parse<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[derive(Deserialize)]
struct ValidationBody {
    errors: Vec<FieldMessage>,
}

#[derive(Deserialize)]
struct FieldMessage {
    message: String,
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        401 => Err(ApiError::Unauthorized),
        400 => match serde_json::from_str::<ValidationBody>(&response.body) {
            Ok(body) => Err(ApiError::Validation(
                body.errors.into_iter().map(|e| e.message).collect(),
            )),
            Err(_) => Err(ApiError::HttpError {
                status: 400,
                body: response.body.clone(),
            }),
        },
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"{"id":"00000000-0000-0000-0000-000000000001","owner":"00000000-0000-0000-0000-000000000002","name":"Groceries","items":[{"id":"00000000-0000-0000-0000-000000000003","text":"Milk","completed":true,"createdAt":"2026-10-19T10:00:00Z","updatedAt":"2026-10-19T10:05:00Z"}],"createdAt":"2026-10-19T09:00:00Z","updatedAt":"2026-10-19T10:05:00Z"}"#;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:5000").with_token("tok")
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:5000/api/todos");
        assert!(req.body.is_none());
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn requests_without_token_carry_no_authorization() {
        let req = TodoClient::new("http://localhost:5000").build_get_todo(Uuid::nil());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:5000/api/todos/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = TodoName {
            name: "Groceries".to_string(),
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:5000/api/todos");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Groceries" }));
    }

    #[test]
    fn build_update_item_omits_absent_fields() {
        let input = UpdateItem {
            text: None,
            completed: Some(true),
        };
        let req = client()
            .build_update_item(Uuid::nil(), Uuid::nil(), &input)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert!(req.path.ends_with(
            "/api/todos/00000000-0000-0000-0000-000000000000/items/00000000-0000-0000-0000-000000000000"
        ));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "completed": true }));
    }

    #[test]
    fn build_item_routes_nest_under_list() {
        let c = client();
        let add = c
            .build_add_item(Uuid::nil(), &CreateItem { text: "Milk".to_string() })
            .unwrap();
        assert_eq!(add.method, HttpMethod::Post);
        assert!(add.path.ends_with("/items"));

        let delete = c.build_delete_item(Uuid::nil(), Uuid::nil());
        assert_eq!(delete.method, HttpMethod::Delete);
        assert!(delete.body.is_none());
    }

    #[test]
    fn parse_get_todo_success() {
        let list = client().parse_get_todo(HttpResponse::new(200, LIST)).unwrap();
        assert_eq!(list.name, "Groceries");
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.progress(), "1 of 1 items completed");
    }

    #[test]
    fn parse_create_todo_wants_201() {
        let err = client().parse_create_todo(HttpResponse::new(200, LIST)).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 200, .. }));
        assert!(client().parse_create_todo(HttpResponse::new(201, LIST)).is_ok());
    }

    #[test]
    fn parse_validation_error_keeps_messages() {
        let body = r#"{"errors":[{"field":"name","message":"Todo name is required"}]}"#;
        let err = client().parse_create_todo(HttpResponse::new(400, body)).unwrap_err();
        match err {
            ApiError::Validation(messages) => assert_eq!(messages, vec!["Todo name is required"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_not_found_and_unauthorized() {
        let c = client();
        let body = r#"{"message":"Todo not found"}"#;
        assert!(matches!(
            c.parse_get_todo(HttpResponse::new(404, body)).unwrap_err(),
            ApiError::NotFound
        ));
        assert!(matches!(
            c.parse_list_todos(HttpResponse::new(401, "")).unwrap_err(),
            ApiError::Unauthorized
        ));
    }

    #[test]
    fn parse_delete_todo_returns_message() {
        let body = r#"{"message":"Todo deleted successfully"}"#;
        let message = client().parse_delete_todo(HttpResponse::new(200, body)).unwrap();
        assert_eq!(message, "Todo deleted successfully");
    }

    #[test]
    fn parse_server_error() {
        let body = r#"{"message":"Server error"}"#;
        let err = client().parse_delete_item(HttpResponse::new(500, body)).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = TodoClient::new("http://localhost:5000/").build_list_todos();
        assert_eq!(req.path, "http://localhost:5000/api/todos");
    }
}
