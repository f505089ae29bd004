//! Serializable view of a session for the presentation layer

use serde::Serialize;

use crate::models::Message;
use crate::pagination::PageState;
use crate::query::{FilterCounts, FilterMode};
use crate::selection::Selection;

/// Everything a renderer needs to draw the inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxSnapshot {
    pub page: PageState,
    pub filter: FilterMode,
    /// Counts over the whole page, not just the filtered messages
    pub counts: FilterCounts,
    /// Messages visible under `filter`, in page order
    pub messages: Vec<Message>,
    pub selection: Selection,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}
