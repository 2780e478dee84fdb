//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! so the client never links against Axum. Integration tests catch any schema
//! drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry of a todo list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A todo list as returned by the API, items included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub items: Vec<TodoItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoList {
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    pub fn item(&self, id: Uuid) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// "`completed` of `total` items completed".
    pub fn progress(&self) -> String {
        format!(
            "{} of {} items completed",
            self.completed_count(),
            self.items.len()
        )
    }
}

/// Request payload for creating or renaming a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoName {
    pub name: String,
}

/// Request payload for appending an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    pub text: String,
}

/// Request payload for updating an item. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Body of a successful list deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}
