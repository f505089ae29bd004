//! Query API for UI consumption
//!
//! Provides projections of the canonical message list for display.

mod filter;

pub use filter::{FilterCounts, FilterMode, count_by_mode, filter_messages};
