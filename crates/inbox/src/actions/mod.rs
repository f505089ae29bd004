//! Message actions module
//!
//! Provides the action handler for user edits to a message's flags
//! (favorite, read) and for discarding all edits.

mod handler;

pub use handler::ActionHandler;
