use uuid::Uuid;

use super::banner;
use crate::session::{Session, Transport};
use crate::types::TodoList;

/// A single list and its items.
#[derive(Debug)]
pub struct Detail {
    id: Uuid,
    list: Option<TodoList>,
    loading: bool,
    error: Option<String>,
    new_item_text: String,
}

impl Detail {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            list: None,
            loading: true,
            error: None,
            new_item_text: String::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn list(&self) -> Option<&TodoList> {
        self.list.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn new_item_text(&self) -> &str {
        &self.new_item_text
    }

    pub fn mount<T: Transport>(&mut self, session: &mut Session<T>) {
        match session.get_todo(self.id) {
            Ok(list) => self.list = Some(list),
            Err(_) => self.error = Some("Failed to fetch todo".to_string()),
        }
        self.loading = false;
    }

    /// Points the view at another list and refetches. Same id is a no-op.
    /// Nothing from the previous list survives the switch.
    pub fn set_id<T: Transport>(&mut self, session: &mut Session<T>, id: Uuid) {
        if id == self.id {
            return;
        }
        self.id = id;
        self.list = None;
        self.error = None;
        self.loading = true;
        self.mount(session);
    }

    pub fn set_new_item_text(&mut self, text: impl Into<String>) {
        self.new_item_text = text.into();
    }

    /// Whether the add button is enabled.
    pub fn can_add(&self) -> bool {
        !self.new_item_text.trim().is_empty()
    }

    pub fn add_item<T: Transport>(&mut self, session: &mut Session<T>) {
        if !self.can_add() {
            return;
        }
        match session.add_item(self.id, &self.new_item_text) {
            Ok(list) => {
                self.list = Some(list);
                self.new_item_text.clear();
            }
            Err(_) => self.error = Some("Failed to add item".to_string()),
        }
    }

    /// Flips the completed flag of an item currently shown.
    pub fn toggle_item<T: Transport>(&mut self, session: &mut Session<T>, item_id: Uuid) {
        let Some(completed) = self
            .list
            .as_ref()
            .and_then(|list| list.item(item_id))
            .map(|item| item.completed)
        else {
            return;
        };
        match session.set_item_completed(self.id, item_id, !completed) {
            Ok(list) => self.list = Some(list),
            Err(_) => self.error = Some("Failed to update item".to_string()),
        }
    }

    pub fn delete_item<T: Transport>(&mut self, session: &mut Session<T>, item_id: Uuid) {
        match session.delete_item(self.id, item_id) {
            Ok(list) => self.list = Some(list),
            Err(_) => self.error = Some("Failed to delete item".to_string()),
        }
    }

    pub fn render(&self) -> String {
        if self.loading {
            return "Loading...\n".to_string();
        }
        let Some(list) = &self.list else {
            let mut out = String::new();
            banner(&mut out, self.error());
            out.push_str("Todo not found\n");
            return out;
        };

        let mut out = format!("{}\n{}\n", list.name, list.progress());
        banner(&mut out, self.error());
        for (index, item) in list.items.iter().enumerate() {
            let mark = if item.completed { 'x' } else { ' ' };
            out.push_str(&format!("{}. [{mark}] {}\n", index + 1, item.text));
        }
        if list.items.is_empty() {
            out.push_str("No items yet. Add your first item above!\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::views::testing::{list_json, ok, session};

    const LIST: u128 = 1;
    const MILK: u128 = 10;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn mount_shows_items_and_summary() {
        let mut session = session(vec![ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", true)]))]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);

        assert_eq!(
            view.render(),
            "Groceries\n1 of 1 items completed\n1. [x] Milk\n"
        );
    }

    #[test]
    fn mount_not_found_renders_message() {
        let mut session = session(vec![ok(404, r#"{"message":"Todo not found"}"#.to_string())]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);

        assert!(view.list().is_none());
        assert_eq!(view.error(), Some("Failed to fetch todo"));
        assert!(view.render().ends_with("Todo not found\n"));
    }

    #[test]
    fn add_item_replaces_list_and_clears_field() {
        let mut session = session(vec![
            ok(200, list_json(LIST, "Groceries", &[])),
            ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", false)])),
        ]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);
        assert!(view.render().contains("No items yet"));

        assert!(!view.can_add());
        view.set_new_item_text("Milk");
        assert!(view.can_add());
        view.add_item(&mut session);

        assert_eq!(view.list().unwrap().items.len(), 1);
        assert_eq!(view.new_item_text(), "");
        let request = &session.transport().requests[1];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.path.ends_with("/items"));
    }

    #[test]
    fn blank_item_makes_no_request() {
        let mut session = session(vec![ok(200, list_json(LIST, "Groceries", &[]))]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);
        view.set_new_item_text("  ");
        view.add_item(&mut session);
        assert_eq!(session.transport().requests.len(), 1);
    }

    #[test]
    fn toggle_sends_inverse_of_current_flag() {
        let mut session = session(vec![
            ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", false)])),
            ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", true)])),
        ]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);
        view.toggle_item(&mut session, id(MILK));

        let body: serde_json::Value =
            serde_json::from_str(session.transport().requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "completed": true }));
        assert!(view.list().unwrap().items[0].completed);
    }

    #[test]
    fn toggle_of_unknown_item_makes_no_request() {
        let mut session = session(vec![ok(200, list_json(LIST, "Groceries", &[]))]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);
        view.toggle_item(&mut session, id(MILK));
        assert_eq!(session.transport().requests.len(), 1);
    }

    #[test]
    fn failed_mutation_keeps_previous_list() {
        let mut session = session(vec![
            ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", false)])),
            Err(ApiError::Transport("reset".to_string())),
            ok(500, r#"{"message":"Server error"}"#.to_string()),
        ]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);
        let before = view.list().cloned();

        view.toggle_item(&mut session, id(MILK));
        assert_eq!(view.error(), Some("Failed to update item"));
        view.delete_item(&mut session, id(MILK));
        assert_eq!(view.error(), Some("Failed to delete item"));

        assert_eq!(view.list().cloned(), before);
        assert!(view.render().contains("! Failed to delete item"));
    }

    #[test]
    fn delete_item_adopts_server_list() {
        let mut session = session(vec![
            ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", true)])),
            ok(200, list_json(LIST, "Groceries", &[])),
        ]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);
        view.delete_item(&mut session, id(MILK));
        assert_eq!(view.list().unwrap().progress(), "0 of 0 items completed");
    }

    #[test]
    fn set_id_refetches_only_on_change() {
        let mut session = session(vec![
            ok(200, list_json(LIST, "Groceries", &[])),
            ok(200, list_json(2, "Chores", &[])),
        ]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);

        view.set_id(&mut session, id(LIST));
        assert_eq!(session.transport().requests.len(), 1);

        view.set_id(&mut session, id(2));
        assert_eq!(view.id(), id(2));
        assert_eq!(view.list().unwrap().name, "Chores");
        assert_eq!(session.transport().calls().len(), 2);
    }

    #[test]
    fn set_id_drops_previous_list_when_refetch_fails() {
        let mut session = session(vec![
            ok(200, list_json(LIST, "Groceries", &[(MILK, "Milk", false)])),
            ok(404, r#"{"message":"Todo not found"}"#.to_string()),
        ]);
        let mut view = Detail::new(id(LIST));
        view.mount(&mut session);

        view.set_id(&mut session, id(2));
        assert!(view.list().is_none());
        assert_eq!(view.error(), Some("Failed to fetch todo"));
        assert!(!view.render().contains("Groceries"));
        assert!(view.render().ends_with("Todo not found\n"));
    }
}
