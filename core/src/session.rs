//! One-call-per-action API access for the views.
//!
//! A `Session` pairs a `TodoClient` with a `Transport` and runs the
//! build/execute/parse cycle for each operation. Transports are supplied by
//! the host: the terminal client wraps `ureq`, tests script responses.

use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateItem, TodoList, TodoName, UpdateItem};

/// Executes a request and hands back whatever the server answered.
///
/// Non-2xx statuses must come back as `Ok`; only failures to obtain a
/// response at all are `Err`.
pub trait Transport {
    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: FnMut(HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

pub struct Session<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_todos(&mut self) -> Result<Vec<TodoList>, ApiError> {
        let response = self.transport.execute(self.client.build_list_todos())?;
        self.client.parse_list_todos(response)
    }

    pub fn get_todo(&mut self, id: Uuid) -> Result<TodoList, ApiError> {
        let response = self.transport.execute(self.client.build_get_todo(id))?;
        self.client.parse_get_todo(response)
    }

    pub fn create_todo(&mut self, name: &str) -> Result<TodoList, ApiError> {
        let request = self.client.build_create_todo(&TodoName {
            name: name.to_string(),
        })?;
        let response = self.transport.execute(request)?;
        self.client.parse_create_todo(response)
    }

    pub fn rename_todo(&mut self, id: Uuid, name: &str) -> Result<TodoList, ApiError> {
        let request = self.client.build_rename_todo(
            id,
            &TodoName {
                name: name.to_string(),
            },
        )?;
        let response = self.transport.execute(request)?;
        self.client.parse_rename_todo(response)
    }

    pub fn delete_todo(&mut self, id: Uuid) -> Result<String, ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response)
    }

    pub fn add_item(&mut self, id: Uuid, text: &str) -> Result<TodoList, ApiError> {
        let request = self.client.build_add_item(
            id,
            &CreateItem {
                text: text.to_string(),
            },
        )?;
        let response = self.transport.execute(request)?;
        self.client.parse_add_item(response)
    }

    pub fn update_item(
        &mut self,
        id: Uuid,
        item_id: Uuid,
        patch: &UpdateItem,
    ) -> Result<TodoList, ApiError> {
        let request = self.client.build_update_item(id, item_id, patch)?;
        let response = self.transport.execute(request)?;
        self.client.parse_update_item(response)
    }

    pub fn set_item_completed(
        &mut self,
        id: Uuid,
        item_id: Uuid,
        completed: bool,
    ) -> Result<TodoList, ApiError> {
        let patch = UpdateItem {
            text: None,
            completed: Some(completed),
        };
        self.update_item(id, item_id, &patch)
    }

    pub fn delete_item(&mut self, id: Uuid, item_id: Uuid) -> Result<TodoList, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_delete_item(id, item_id))?;
        self.client.parse_delete_item(response)
    }
}
