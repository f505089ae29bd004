//! Reconciliation of fetched pages with stored user edits
//!
//! Pure functions: the same page and overrides always give the same list.

mod merge;

pub use merge::{apply_override, reconcile};
