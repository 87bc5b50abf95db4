//! Core domain logic for huskeliste.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{Collection, ItemId, ListId, TodoItem, TodoList};
pub use repo::collection_repo::{
    CollectionRepository, RepoError, RepoResult, SqliteCollectionRepository, STORAGE_KEY,
};
pub use service::todo_service::TodoService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
