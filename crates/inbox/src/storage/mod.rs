//! Storage traits and implementations
//!
//! This module defines the storage abstraction for per-message user edits.
//! The trait-based design allows swapping between the in-memory store used
//! by tests and the SQLite store that persists across restarts.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryOverrideStore;
pub use sqlite::SqliteOverrideStore;
pub use traits::OverrideStore;
