use uuid::Uuid;

use super::banner;
use crate::session::{Session, Transport};
use crate::types::TodoList;

/// The "new todo list" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDialog {
    pub open: bool,
    pub name: String,
}

/// One card on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCard {
    pub id: Uuid,
    pub name: String,
    pub progress: String,
    pub created: String,
}

/// All of the caller's lists, newest first.
#[derive(Debug)]
pub struct Dashboard {
    lists: Vec<TodoList>,
    loading: bool,
    error: Option<String>,
    dialog: CreateDialog,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            lists: Vec::new(),
            loading: true,
            error: None,
            dialog: CreateDialog::default(),
        }
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dialog(&self) -> &CreateDialog {
        &self.dialog
    }

    pub fn mount<T: Transport>(&mut self, session: &mut Session<T>) {
        match session.list_todos() {
            Ok(lists) => self.lists = lists,
            Err(_) => self.error = Some("Failed to fetch todos".to_string()),
        }
        self.loading = false;
    }

    pub fn open_dialog(&mut self) {
        self.dialog.open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog.open = false;
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.dialog.name = name.into();
    }

    /// Submits the dialog. A blank name makes no request.
    pub fn create<T: Transport>(&mut self, session: &mut Session<T>) {
        if self.dialog.name.trim().is_empty() {
            return;
        }
        match session.create_todo(&self.dialog.name) {
            Ok(list) => {
                self.lists.insert(0, list);
                self.dialog = CreateDialog::default();
            }
            Err(_) => self.error = Some("Failed to create todo".to_string()),
        }
    }

    pub fn delete<T: Transport>(&mut self, session: &mut Session<T>, id: Uuid) {
        match session.delete_todo(id) {
            Ok(_) => self.lists.retain(|list| list.id != id),
            Err(_) => self.error = Some("Failed to delete todo".to_string()),
        }
    }

    /// Id of the list behind the `index`th card, for opening its detail view.
    pub fn open(&self, index: usize) -> Option<Uuid> {
        self.lists.get(index).map(|list| list.id)
    }

    pub fn cards(&self) -> Vec<ListCard> {
        self.lists
            .iter()
            .map(|list| ListCard {
                id: list.id,
                name: list.name.clone(),
                progress: list.progress(),
                created: list.created_at.format("%Y-%m-%d").to_string(),
            })
            .collect()
    }

    pub fn render(&self) -> String {
        if self.loading {
            return "Loading...\n".to_string();
        }
        let mut out = String::from("My Todo Lists\n");
        banner(&mut out, self.error());
        for (index, card) in self.cards().iter().enumerate() {
            out.push_str(&format!(
                "[{}] {}\n    {}\n    Created: {}\n",
                index + 1,
                card.name,
                card.progress,
                card.created
            ));
        }
        if self.lists.is_empty() {
            out.push_str("No todo lists yet. Create your first one!\n");
        }
        out
    }
}
