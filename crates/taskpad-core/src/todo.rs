//! Todo list state for a single session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Todo item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoItem {
    /// Creation timestamp in Unix milliseconds, unique within its list
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Ordered, in-memory todo list owned by one session.
///
/// Items keep insertion order; nothing is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoList {
    items: Vec<TodoItem>,
    #[serde(skip)]
    last_id: i64,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new open item. Blank text is ignored and yields `None`.
    pub fn add(&mut self, text: impl Into<String>) -> Option<i64> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }

        let created_at = Utc::now();
        let id = self.next_id(created_at.timestamp_millis());
        self.items.push(TodoItem {
            id,
            text,
            completed: false,
            created_at,
        });
        Some(id)
    }

    /// Flip `completed` on the matching item. Returns whether an item matched.
    pub fn toggle(&mut self, id: i64) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    /// Remove the matching item. Returns whether an item matched.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drop every completed item, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        before - self.items.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|item| item.completed)
    }

    /// Footer text, e.g. "1 task remaining" or "3 tasks remaining".
    pub fn remaining_label(&self) -> String {
        let remaining = self.remaining_count();
        let noun = if remaining == 1 { "task" } else { "tasks" };
        format!("{} {} remaining", remaining, noun)
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain-text rendering used by terminal front-ends
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return "No tasks yet".to_string();
        }

        let mut output = String::new();
        for (index, item) in self.items.iter().enumerate() {
            let status_icon = if item.completed { "[x]" } else { "[ ]" };
            output.push_str(&format!("{:>3}. {} {}\n", index + 1, status_icon, item.text));
        }
        output.push_str(&format!("\n{}", self.remaining_label()));
        output
    }

    fn next_id(&mut self, now_millis: i64) -> i64 {
        // The highest id may come from deserialized items.
        let floor = self
            .items
            .iter()
            .map(|item| item.id)
            .max()
            .unwrap_or(i64::MIN)
            .max(self.last_id);
        let id = if now_millis > floor { now_millis } else { floor + 1 };
        self.last_id = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_open_item_at_end() {
        let mut list = TodoList::new();
        let first = list.add("Buy milk").expect("id");
        let second = list.add("Walk dog").expect("id");

        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].id, first);
        assert_eq!(list.items()[1].id, second);
        assert_eq!(list.items()[1].text, "Walk dog");
        assert!(!list.items()[1].completed);
    }

    #[test]
    fn add_blank_text_is_noop() {
        let mut list = TodoList::new();
        assert_eq!(list.add(""), None);
        assert_eq!(list.add("   "), None);
        assert_eq!(list.add("\t\n"), None);
        assert!(list.is_empty());
    }

    #[test]
    fn add_keeps_text_as_given() {
        let mut list = TodoList::new();
        let id = list.add("  padded  ").unwrap();
        assert_eq!(list.get(id).unwrap().text, "  padded  ");
    }

    #[test]
    fn ids_are_unique_even_within_one_millisecond() {
        let mut list = TodoList::new();
        let ids: Vec<i64> = (0..100).filter_map(|i| list.add(format!("task {i}"))).collect();

        assert_eq!(ids.len(), 100);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut list = TodoList::new();
        let id = list.add("Buy milk").unwrap();

        assert!(list.toggle(id));
        assert!(list.get(id).unwrap().completed);
        assert!(list.toggle(id));
        assert!(!list.get(id).unwrap().completed);
    }

    #[test]
    fn toggle_and_delete_unknown_id_are_noops() {
        let mut list = TodoList::new();
        list.add("Buy milk");
        let snapshot = list.items().to_vec();

        assert!(!list.toggle(42));
        assert!(!list.delete(42));
        assert_eq!(list.items(), snapshot.as_slice());
    }

    #[test]
    fn delete_removes_only_matching_item() {
        let mut list = TodoList::new();
        let a = list.add("a").unwrap();
        let b = list.add("b").unwrap();
        let c = list.add("c").unwrap();

        assert!(list.delete(b));
        let ids: Vec<i64> = list.items().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn clear_completed_is_idempotent() {
        let mut list = TodoList::new();
        let a = list.add("a").unwrap();
        list.add("b");
        let c = list.add("c").unwrap();
        list.toggle(a);
        list.toggle(c);

        assert_eq!(list.clear_completed(), 2);
        let once = list.items().to_vec();
        assert_eq!(list.clear_completed(), 0);
        assert_eq!(list.items(), once.as_slice());
        assert!(!list.has_completed());
    }

    #[test]
    fn buy_milk_scenario() {
        let mut list = TodoList::new();
        let id = list.add("Buy milk").unwrap();
        assert_eq!(list.items()[0].text, "Buy milk");
        assert!(!list.items()[0].completed);

        list.toggle(id);
        assert!(list.items()[0].completed);
        assert_eq!(list.remaining_count(), 0);

        list.clear_completed();
        assert!(list.is_empty());
    }

    #[test]
    fn remaining_label_pluralizes() {
        let mut list = TodoList::new();
        assert_eq!(list.remaining_label(), "0 tasks remaining");
        list.add("one");
        assert_eq!(list.remaining_label(), "1 task remaining");
        list.add("two");
        assert_eq!(list.remaining_label(), "2 tasks remaining");
    }

    #[test]
    fn render_marks_completed_items() {
        let mut list = TodoList::new();
        assert_eq!(list.render(), "No tasks yet");

        let id = list.add("Buy milk").unwrap();
        list.add("Walk dog");
        list.toggle(id);

        let rendered = list.render();
        assert!(rendered.contains("1. [x] Buy milk"));
        assert!(rendered.contains("2. [ ] Walk dog"));
        assert!(rendered.ends_with("1 task remaining"));
    }

    #[test]
    fn deserialized_list_keeps_ids_increasing() {
        let mut list = TodoList::new();
        let id = list.add("a").unwrap();
        let json = serde_json::to_string(&list).unwrap();

        let mut restored: TodoList = serde_json::from_str(&json).unwrap();
        let next = restored.add("b").unwrap();
        assert!(next > id);
    }
}
