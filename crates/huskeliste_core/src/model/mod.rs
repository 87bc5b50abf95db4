//! Domain model for the to-do board.
//!
//! # Responsibility
//! - Define the canonical collection/list/item records.
//! - Provide the pure immutable-update operations driven by UI events.
//!
//! # Invariants
//! - Mutations construct a new `Collection` value; nothing is edited in
//!   place.
//! - The active-list selector always names a list present in the
//!   collection.

pub mod collection;
