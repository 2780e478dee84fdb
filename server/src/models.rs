//! Todo list documents and the request payloads that mutate them.
//!
//! # Design
//! A `TodoList` is an aggregate that owns its items outright. Items are kept
//! in insertion order in a `Vec` and addressed by id within their parent;
//! there is no item lookup outside a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{present, required, FieldError, Validate};

/// A single completable entry inside a todo list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoItem {
    fn new(text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A named, owned list of items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
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
    /// Creates an empty list. `name` is expected to be validated already.
    pub fn new(owner: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            name,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, owner: Uuid) -> bool {
        self.owner == owner
    }

    /// Appends a new incomplete item and returns its id.
    pub fn push_item(&mut self, text: String) -> Uuid {
        let item = TodoItem::new(text);
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn remove_item(&mut self, id: Uuid) -> Option<TodoItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}

/// Body of `POST /api/todos` and `PUT /api/todos/{id}`.
#[derive(Debug, Deserialize)]
pub struct ListName {
    #[serde(default)]
    pub name: String,
}

impl Validate for ListName {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        required(&mut self.name, "name", "Todo name is required")
            .map_err(|e| vec![e])
    }
}

/// Body of `POST /api/todos/{id}/items`.
#[derive(Debug, Deserialize)]
pub struct CreateItem {
    #[serde(default)]
    pub text: String,
}

impl Validate for CreateItem {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        required(&mut self.text, "text", "Item text is required")
            .map_err(|e| vec![e])
    }
}

/// Body of `PUT /api/todos/{id}/items/{item_id}`. Absent fields are left
/// untouched on the stored item; an explicit `null` is a validation error.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItem {
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

impl UpdateItem {
    pub fn apply(self, item: &mut TodoItem) {
        if let Some(Some(text)) = self.text {
            item.text = text;
        }
        if let Some(Some(completed)) = self.completed {
            item.completed = completed;
        }
        item.updated_at = Utc::now();
    }
}

impl Validate for UpdateItem {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        match self.text.as_mut() {
            Some(Some(text)) => {
                if let Err(e) = required(text, "text", "Item text cannot be empty") {
                    errors.push(e);
                }
            }
            Some(None) => errors.push(FieldError::new("text", "Item text cannot be empty")),
            None => {}
        }
        if let Some(None) = self.completed {
            errors.push(FieldError::new("completed", "Completed must be a boolean"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> TodoList {
        TodoList::new(Uuid::new_v4(), "Groceries".to_string())
    }

    #[test]
    fn new_list_is_empty() {
        let list = list();
        assert!(list.items.is_empty());
        assert_eq!(list.created_at, list.updated_at);
    }

    #[test]
    fn pushed_item_defaults_to_incomplete() {
        let mut list = list();
        let id = list.push_item("Milk".to_string());
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, id);
        assert!(!list.items[0].completed);
    }

    #[test]
    fn remove_item_keeps_order_of_the_rest() {
        let mut list = list();
        let a = list.push_item("a".to_string());
        let b = list.push_item("b".to_string());
        let c = list.push_item("c".to_string());
        assert_eq!(list.remove_item(b).map(|item| item.text), Some("b".to_string()));
        let ids: Vec<Uuid> = list.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(list.remove_item(b).is_none());
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut list = list();
        let id = list.push_item("Milk".to_string());
        let item = list.item_mut(id).unwrap();

        UpdateItem { text: None, completed: Some(Some(true)) }.apply(item);
        assert_eq!(item.text, "Milk");
        assert!(item.completed);

        UpdateItem { text: Some(Some("Oat milk".to_string())), completed: None }.apply(item);
        assert_eq!(item.text, "Oat milk");
        assert!(item.completed);
    }

    #[test]
    fn completed_count_counts_only_done_items() {
        let mut list = list();
        let id = list.push_item("a".to_string());
        list.push_item("b".to_string());
        list.item_mut(id).unwrap().completed = true;
        assert_eq!(list.completed_count(), 1);
    }

    #[test]
    fn list_name_is_trimmed_on_validation() {
        let mut input: ListName = serde_json::from_str(r#"{"name":"  Chores  "}"#).unwrap();
        input.validate().unwrap();
        assert_eq!(input.name, "Chores");
    }

    #[test]
    fn blank_list_name_is_rejected() {
        let mut input: ListName = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn missing_list_name_is_rejected() {
        let mut input: ListName = serde_json::from_str("{}").unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_item_all_fields_optional() {
        let mut input: UpdateItem = serde_json::from_str("{}").unwrap();
        assert!(input.validate().is_ok());
        assert!(input.text.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn update_item_rejects_blank_text() {
        let mut input: UpdateItem = serde_json::from_str(r#"{"text":" "}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_item_rejects_null_fields() {
        let mut input: UpdateItem =
            serde_json::from_str(r#"{"text":null,"completed":null}"#).unwrap();
        let errors = input.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["text", "completed"]);
    }

    #[test]
    fn update_item_rejects_non_boolean_completed() {
        let result: Result<UpdateItem, _> = serde_json::from_str(r#"{"completed":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn list_serializes_with_camel_case_timestamps() {
        let json = serde_json::to_value(list()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["items"], serde_json::json!([]));
    }
}
