//! To-do collection domain model.
//!
//! # Responsibility
//! - Define the list/item records persisted by the app.
//! - Provide pure update operations: add, toggle, select, read.
//!
//! # Invariants
//! - Every operation returns a new `Collection` value; unaffected lists
//!   and items are value-equal to their inputs.
//! - Item ids are strictly increasing within a process, so an id is
//!   unique within its list at creation time.
//! - Trimmed-empty text is never inserted as an item.
//! - `select_list` refuses ids that name no list, keeping the selector
//!   pointing at a present list.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Stable identifier of a list, as shown in the tab strip.
pub type ListId = i64;

/// Stable identifier of a single to-do item.
///
/// Epoch milliseconds at creation time, bumped past the previously issued
/// id when two items land in the same clock tick.
pub type ItemId = i64;

static LAST_ITEM_ID: AtomicI64 = AtomicI64::new(0);

/// Allocates the next item id.
///
/// Wall-clock shaped but strictly increasing, so ids stay unique even
/// when the clock is stuck or steps backwards.
fn next_item_id() -> ItemId {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0);

    let mut last = LAST_ITEM_ID.load(Ordering::SeqCst);
    loop {
        let candidate = now_ms.max(last + 1);
        match LAST_ITEM_ID.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Creation-time id, unique within the owning list.
    pub id: ItemId,
    /// Entry text exactly as submitted. The emptiness guard trims a copy;
    /// the stored text keeps its surrounding whitespace.
    pub text: String,
    /// Completion flag, inverted by `Collection::toggle_item`.
    pub completed: bool,
}

impl TodoItem {
    /// Creates an item with a fresh id and `completed = false`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: next_item_id(),
            text: text.into(),
            completed: false,
        }
    }

    /// Returns a copy with the completion flag inverted.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// A named, ordered list of items, selectable via tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Stable list id referenced by the active-list selector.
    pub id: ListId,
    /// Display name shown on the tab.
    pub name: String,
    /// Items, newest first: `Collection::add_item` prepends.
    pub todos: Vec<TodoItem>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            todos: Vec::new(),
        }
    }
}

/// Full persisted state: all lists plus the active-list selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Lists in tab display order.
    pub lists: Vec<TodoList>,
    /// Id of the list currently displayed and targeted by mutations.
    pub active_list: ListId,
}

impl Collection {
    /// First-run collection: three empty default lists, first one active.
    pub fn seed() -> Self {
        Self {
            lists: vec![
                TodoList::new(1, "Dagligvarer"),
                TodoList::new(2, "Hytteutstyr"),
                TodoList::new(3, "Handle på nett"),
            ],
            active_list: 1,
        }
    }

    /// Prepends a fresh item to the list matching `active_list`.
    ///
    /// # Contract
    /// - Text whose trimmed form is empty: identity (value-equal copy).
    /// - Otherwise the matching list gains one item at the front with a
    ///   new id, `completed = false`, and the text as given.
    /// - An `active_list` that names no list: identity.
    pub fn add_item(&self, active_list: ListId, text: &str) -> Self {
        if text.trim().is_empty() {
            return self.clone();
        }

        let lists = self
            .lists
            .iter()
            .map(|list| {
                if list.id != active_list {
                    return list.clone();
                }
                let mut todos = Vec::with_capacity(list.todos.len() + 1);
                todos.push(TodoItem::new(text));
                todos.extend(list.todos.iter().cloned());
                TodoList {
                    id: list.id,
                    name: list.name.clone(),
                    todos,
                }
            })
            .collect();

        Self {
            lists,
            active_list: self.active_list,
        }
    }

    /// Inverts the completion flag of `item` in the list matching
    /// `active_list`.
    ///
    /// # Contract
    /// - Never adds or removes items.
    /// - An unknown list or item id: identity.
    pub fn toggle_item(&self, active_list: ListId, item: ItemId) -> Self {
        let lists = self
            .lists
            .iter()
            .map(|list| {
                if list.id != active_list {
                    return list.clone();
                }
                let todos = list
                    .todos
                    .iter()
                    .map(|todo| {
                        if todo.id == item {
                            todo.toggled()
                        } else {
                            todo.clone()
                        }
                    })
                    .collect();
                TodoList {
                    id: list.id,
                    name: list.name.clone(),
                    todos,
                }
            })
            .collect();

        Self {
            lists,
            active_list: self.active_list,
        }
    }

    /// Items of the list matching `list`, or an empty slice when no list
    /// matches. Must not fail: the renderer calls this unconditionally.
    pub fn active_todos(&self, list: ListId) -> &[TodoItem] {
        self.lists
            .iter()
            .find(|candidate| candidate.id == list)
            .map(|candidate| candidate.todos.as_slice())
            .unwrap_or(&[])
    }

    /// Returns a copy with `active_list` switched to `list`.
    ///
    /// Ids that name no list are refused (identity), so the selector
    /// always points at a present list.
    pub fn select_list(&self, list: ListId) -> Self {
        if !self.lists.iter().any(|candidate| candidate.id == list) {
            return self.clone();
        }
        Self {
            lists: self.lists.clone(),
            active_list: list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::next_item_id;

    #[test]
    fn item_ids_are_strictly_increasing() {
        let first = next_item_id();
        let second = next_item_id();
        let third = next_item_id();
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn item_ids_stay_close_to_wall_clock() {
        let now_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_millis() as i64;
        let id = next_item_id();
        // Allocation bumps at most a few ticks past the clock in tests.
        assert!(id >= now_ms);
        assert!(id < now_ms + 1_000);
    }
}
