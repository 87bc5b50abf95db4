//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate state-store operations and persistence mirroring.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod todo_service;
