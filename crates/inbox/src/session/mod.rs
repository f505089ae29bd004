//! Inbox session
//!
//! Ties the fetcher, override store, reconciliation, pagination, filtering,
//! actions and selection together behind the intents the UI emits.

mod inbox;
mod snapshot;

pub use inbox::{Inbox, PageOutcome, SessionOptions};
pub use snapshot::InboxSnapshot;
