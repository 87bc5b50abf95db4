//! Persistence gateway abstractions and implementations.
//!
//! # Responsibility
//! - Define the single-value persistence contract for the collection.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - The collection is persisted wholesale under one fixed key; there is
//!   no partial write path.
//! - `load` distinguishes an absent value from a corrupt one.

pub mod collection_repo;
