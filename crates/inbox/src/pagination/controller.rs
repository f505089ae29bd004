//! Pagination controller

use log::{debug, info};
use serde::Serialize;

use crate::error::{NetworkError, PageError};
use crate::models::MessageSummary;

/// Where the controller is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// No page has been requested yet
    Idle,
    /// A page fetch is in flight
    Loading,
    /// The last fetch returned at least one message
    Loaded,
    /// The last fetch returned no messages (end of list)
    Empty,
    /// The last fetch failed
    Error,
}

/// Snapshot of pagination for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageState {
    /// Page of the last completed fetch (1-based)
    pub page_number: u32,
    pub status: PageStatus,
    /// Why the last fetch produced no page
    #[serde(skip)]
    pub error: Option<PageError>,
    /// Text for the list view when `error` is set
    pub error_message: Option<String>,
}

/// Tag attached to an issued page request
///
/// Only the most recently issued ticket is accepted on completion; older
/// ones belong to requests the user has already moved past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    page: u32,
    generation: u64,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Result of feeding a fetch result back into the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The ticket was superseded; nothing changed
    Stale,
    /// The page has messages to reconcile and show
    Loaded(Vec<MessageSummary>),
    /// The page was empty; the list should be cleared
    Empty,
    /// The fetch failed; the current list stays as it was
    Failed(PageError),
}

/// State machine for page navigation
///
/// `Idle -> Loading -> {Loaded, Empty, Error}`. Once a fetch completes
/// `Empty` or `Error`, pages after it are refused until a later fetch
/// loads; issuing a new request does not lift the block.
/// Navigation is relative to the most recently requested page, which equals
/// `page_number` whenever no request is in flight.
pub struct PageController {
    state: PageState,
    /// Most recently requested page
    target: u32,
    /// Last page reachable after an `Empty` or `Error` completion
    blocked_after: Option<u32>,
    generation: u64,
    /// Generation of the request still awaiting completion
    in_flight: Option<u64>,
    conflate_errors: bool,
}

impl PageController {
    /// Create a controller positioned at `start_page` (clamped to 1)
    ///
    /// With `conflate_errors`, failed and empty fetches both surface the
    /// same end-of-list message.
    pub fn new(start_page: u32, conflate_errors: bool) -> Self {
        let start_page = start_page.max(1);
        Self {
            state: PageState {
                page_number: start_page,
                status: PageStatus::Idle,
                error: None,
                error_message: None,
            },
            target: start_page,
            blocked_after: None,
            generation: 0,
            in_flight: None,
            conflate_errors,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn page_number(&self) -> u32 {
        self.state.page_number
    }

    pub fn status(&self) -> PageStatus {
        self.state.status
    }

    /// Page of the most recent request, completed or not
    pub fn target_page(&self) -> u32 {
        self.target
    }

    /// False once the last completed fetch came back empty or failed,
    /// unless a request for an earlier page is in flight
    pub fn can_go_next(&self) -> bool {
        self.allows(self.target.saturating_add(1))
    }

    fn allows(&self, page: u32) -> bool {
        self.blocked_after.is_none_or(|last| page <= last)
    }

    pub fn can_go_previous(&self) -> bool {
        self.target > 1
    }

    /// Request a specific page
    ///
    /// Returns `None` for page 0, and for pages past the one that ended the
    /// list.
    pub fn request(&mut self, page: u32) -> Option<PageTicket> {
        if page == 0 {
            return None;
        }
        if !self.allows(page) {
            debug!(
                "Ignoring request for page {}: list ended at page {:?}",
                page, self.blocked_after
            );
            return None;
        }
        Some(self.issue(page))
    }

    /// Request the page after the most recently requested one
    pub fn next(&mut self) -> Option<PageTicket> {
        let page = self.target.checked_add(1)?;
        self.request(page)
    }

    /// Request the page before the current one, always fetching it fresh
    pub fn previous(&mut self) -> Option<PageTicket> {
        if !self.can_go_previous() {
            return None;
        }
        Some(self.issue(self.target - 1))
    }

    /// Request the current page again
    pub fn retry(&mut self) -> PageTicket {
        self.issue(self.target)
    }

    /// Whether `ticket` is the request the controller is waiting for
    pub fn is_current(&self, ticket: &PageTicket) -> bool {
        self.in_flight == Some(ticket.generation)
    }

    /// Feed the result of a page fetch back in
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<MessageSummary>, NetworkError>,
    ) -> Transition {
        if !self.is_current(&ticket) {
            debug!(
                "Discarding stale response for page {} (generation {}, current {:?})",
                ticket.page, ticket.generation, self.in_flight
            );
            return Transition::Stale;
        }

        self.in_flight = None;
        self.state.page_number = ticket.page;

        match result {
            Ok(messages) if !messages.is_empty() => {
                info!("Loaded page {} ({} messages)", ticket.page, messages.len());
                self.state.status = PageStatus::Loaded;
                self.blocked_after = None;
                self.state.error = None;
                self.state.error_message = None;
                Transition::Loaded(messages)
            }
            Ok(_) => {
                info!("Page {} is empty, end of list", ticket.page);
                self.fail(PageStatus::Empty, PageError::EmptyResult);
                Transition::Empty
            }
            Err(e) => {
                info!("Failed to load page {}: {}", ticket.page, e);
                let error = PageError::Network(e);
                self.fail(PageStatus::Error, error.clone());
                Transition::Failed(error)
            }
        }
    }

    fn issue(&mut self, page: u32) -> PageTicket {
        self.generation += 1;
        self.target = page;
        self.in_flight = Some(self.generation);
        self.state.status = PageStatus::Loading;
        self.state.error = None;
        self.state.error_message = None;

        debug!("Requesting page {} (generation {})", page, self.generation);
        PageTicket {
            page,
            generation: self.generation,
        }
    }

    fn fail(&mut self, status: PageStatus, error: PageError) {
        self.blocked_after = Some(self.state.page_number);
        self.state.status = status;
        self.state.error_message = Some(error.user_message(self.conflate_errors));
        self.state.error = Some(error);
    }
}
