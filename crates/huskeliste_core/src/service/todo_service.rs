//! To-do board use-case service.
//!
//! # Responsibility
//! - Own the in-memory collection the UI renders from.
//! - Mirror every mutation into the persistence gateway.
//!
//! # Invariants
//! - Startup never fails on persistence problems; the seed collection is
//!   the fallback for both an absent and an unreadable stored value.
//! - A failed save leaves the in-memory collection in place; the failure
//!   is logged and not reported to the caller.
//! - Mutations that change nothing are not persisted.

use crate::model::collection::{Collection, ItemId, ListId, TodoItem};
use crate::repo::collection_repo::CollectionRepository;
use log::{error, info};

/// Use-case facade over the collection state and its persistence.
pub struct TodoService<R: CollectionRepository> {
    repo: R,
    collection: Collection,
}

impl<R: CollectionRepository> TodoService<R> {
    /// Opens the service: loads the persisted collection, falling back to
    /// the seed when nothing is stored or the stored value is unreadable.
    pub fn open(repo: R) -> Self {
        let collection = match repo.load() {
            Ok(Some(collection)) => {
                info!(
                    "event=board_load module=service status=ok source=store lists={}",
                    collection.lists.len()
                );
                collection
            }
            Ok(None) => {
                info!("event=board_load module=service status=ok source=seed");
                Collection::seed()
            }
            Err(err) => {
                error!("event=board_load module=service status=error fallback=seed error={err}");
                Collection::seed()
            }
        };

        Self { repo, collection }
    }

    /// Current collection value, the render source of truth.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Items of the active list, newest first.
    pub fn active_todos(&self) -> &[TodoItem] {
        self.collection.active_todos(self.collection.active_list)
    }

    /// Adds one item to the active list.
    ///
    /// Returns the created item id, or `None` for the guarded no-op
    /// (empty text after trimming); a no-op persists nothing.
    pub fn add_todo(&mut self, text: &str) -> Option<ItemId> {
        let updated = self.collection.add_item(self.collection.active_list, text);
        if updated == self.collection {
            return None;
        }

        let created = updated
            .active_todos(updated.active_list)
            .first()
            .map(|item| item.id);
        self.replace_and_persist(updated);
        created
    }

    /// Inverts the completion flag of one item in the active list.
    ///
    /// Returns whether the board changed; ids that name no item there
    /// change nothing.
    pub fn toggle_todo(&mut self, item: ItemId) -> bool {
        let updated = self
            .collection
            .toggle_item(self.collection.active_list, item);
        if updated == self.collection {
            return false;
        }

        self.replace_and_persist(updated);
        true
    }

    /// Switches the active list. Ids that name no list are refused.
    pub fn select_list(&mut self, list: ListId) -> bool {
        let updated = self.collection.select_list(list);
        if updated.active_list == self.collection.active_list {
            return false;
        }

        self.replace_and_persist(updated);
        true
    }

    // State first, storage second: the UI renders from memory and a
    // failed save must not roll it back.
    fn replace_and_persist(&mut self, updated: Collection) {
        self.collection = updated;
        if let Err(err) = self.repo.save(&self.collection) {
            error!("event=board_save module=service status=error error={err}");
        }
    }
}
