//! Detail pane state and lazy body loading

use log::{debug, warn};
use serde::Serialize;

use crate::error::NetworkError;
use crate::models::MessageId;

/// Body shown when a message's content could not be fetched
pub const DETAIL_ERROR_PLACEHOLDER: &str = "Error loading email content.";

/// What the detail pane shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub selected_id: Option<MessageId>,
    /// Body of the selected message once fetched (or the error placeholder)
    pub detail_body: Option<String>,
    pub is_open: bool,
}

/// Tag attached to an issued body fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    id: MessageId,
    generation: u64,
}

impl DetailTicket {
    pub fn id(&self) -> &MessageId {
        &self.id
    }
}

/// Tracks the opened message and its lazily fetched body
///
/// A body that arrives after the user has selected something else, or
/// closed the pane, is dropped.
#[derive(Debug, Default)]
pub struct DetailController {
    selection: Selection,
    generation: u64,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&MessageId> {
        self.selection.selected_id.as_ref()
    }

    /// Open `id` in the detail pane; the caller fetches the body for the
    /// returned ticket
    pub fn select(&mut self, id: MessageId) -> DetailTicket {
        self.generation += 1;
        debug!("Selecting message {} (generation {})", id, self.generation);

        self.selection = Selection {
            selected_id: Some(id.clone()),
            detail_body: None,
            is_open: true,
        };
        DetailTicket {
            id,
            generation: self.generation,
        }
    }

    /// Feed a body fetch result back in
    ///
    /// Returns false if the ticket is stale. A failed fetch shows the
    /// placeholder text; it never closes the pane.
    pub fn complete(
        &mut self,
        ticket: &DetailTicket,
        result: Result<String, NetworkError>,
    ) -> bool {
        if ticket.generation != self.generation || !self.selection.is_open {
            debug!("Discarding stale body for message {}", ticket.id);
            return false;
        }

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to load body for message {}: {}", ticket.id, e);
                DETAIL_ERROR_PLACEHOLDER.to_string()
            }
        };
        self.selection.detail_body = Some(body);
        true
    }

    /// Close the detail pane
    pub fn deselect(&mut self) {
        // Bump so an in-flight fetch for the closed message is discarded.
        self.generation += 1;
        self.selection = Selection::default();
    }
}
