//! The inbox session facade

use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::snapshot::InboxSnapshot;
use crate::actions::ActionHandler;
use crate::config::InboxConfig;
use crate::error::{NetworkError, PageError};
use crate::models::{Message, MessageId, MessageSummary};
use crate::pagination::{PageController, PageState, PageTicket, Transition};
use crate::query::{FilterCounts, FilterMode, count_by_mode, filter_messages};
use crate::reconcile::reconcile;
use crate::remote::MailSource;
use crate::selection::{DetailController, DetailTicket, Selection};
use crate::storage::OverrideStore;

/// Session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub start_page: u32,
    pub conflate_list_errors: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            start_page: 1,
            conflate_list_errors: true,
        }
    }
}

impl From<&InboxConfig> for SessionOptions {
    fn from(config: &InboxConfig) -> Self {
        Self {
            start_page: config.start_page,
            conflate_list_errors: config.conflate_list_errors,
        }
    }
}

/// What happened when a page request completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The response belonged to a superseded request and was dropped
    Stale,
    /// The page was reconciled; holds the number of messages
    Loaded(usize),
    /// The page was empty; the list is now empty
    Empty,
    /// The fetch failed; the previous list is still shown
    Failed(PageError),
}

/// One user's view of the remote mailbox
///
/// All state changes go through `&mut self`, so intents are handled one at
/// a time. Network calls can run elsewhere: `begin_*` methods hand out a
/// ticket, the caller performs the fetch through [`Inbox::source`], and
/// `complete_*` methods apply the result. The blocking helpers
/// (`select_page`, `next_page`, `select_message`, ...) do all three steps.
pub struct Inbox {
    source: Arc<dyn MailSource>,
    store: Arc<dyn OverrideStore>,
    actions: ActionHandler,
    pager: PageController,
    /// Current page exactly as fetched, kept for re-reconciliation
    raw: Vec<MessageSummary>,
    /// Current page with overrides applied
    messages: Vec<Message>,
    filter: FilterMode,
    detail: DetailController,
}

impl Inbox {
    /// Create a session; no page is fetched until the first request
    pub fn new(
        source: Arc<dyn MailSource>,
        store: Arc<dyn OverrideStore>,
        options: SessionOptions,
    ) -> Self {
        Self {
            actions: ActionHandler::new(store.clone()),
            pager: PageController::new(options.start_page, options.conflate_list_errors),
            source,
            store,
            raw: Vec::new(),
            messages: Vec::new(),
            filter: FilterMode::default(),
            detail: DetailController::new(),
        }
    }

    /// The source to run fetches against
    pub fn source(&self) -> Arc<dyn MailSource> {
        self.source.clone()
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Issue a request for `page`; `None` if navigation refuses it
    pub fn begin_page(&mut self, page: u32) -> Option<PageTicket> {
        self.pager.request(page)
    }

    pub fn begin_next(&mut self) -> Option<PageTicket> {
        self.pager.next()
    }

    pub fn begin_previous(&mut self) -> Option<PageTicket> {
        self.pager.previous()
    }

    pub fn begin_retry(&mut self) -> PageTicket {
        self.pager.retry()
    }

    /// Apply the result of a page fetch
    ///
    /// Stored overrides are read before the controller commits, so a store
    /// failure leaves the request pending and the list unchanged.
    pub fn complete_page(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<MessageSummary>, NetworkError>,
    ) -> Result<PageOutcome> {
        if !self.pager.is_current(&ticket) {
            debug!("Ignoring superseded response for page {}", ticket.page());
            return Ok(PageOutcome::Stale);
        }

        let overrides = match &result {
            Ok(summaries) if !summaries.is_empty() => self.store.get_all()?,
            _ => HashMap::new(),
        };

        let outcome = match self.pager.complete(ticket, result) {
            Transition::Stale => PageOutcome::Stale,
            Transition::Loaded(raw) => {
                self.messages = reconcile(&raw, &overrides);
                self.raw = raw;
                PageOutcome::Loaded(self.messages.len())
            }
            Transition::Empty => {
                self.raw.clear();
                self.messages.clear();
                PageOutcome::Empty
            }
            Transition::Failed(error) => PageOutcome::Failed(error),
        };
        Ok(outcome)
    }

    /// Fetch and show `page`; `None` if navigation refuses it
    pub fn select_page(&mut self, page: u32) -> Result<Option<PageOutcome>> {
        match self.begin_page(page) {
            Some(ticket) => self.run_page(ticket).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch and show the next page; `None` once the list has ended
    pub fn next_page(&mut self) -> Result<Option<PageOutcome>> {
        match self.begin_next() {
            Some(ticket) => self.run_page(ticket).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch and show the previous page; `None` on the first page
    pub fn previous_page(&mut self) -> Result<Option<PageOutcome>> {
        match self.begin_previous() {
            Some(ticket) => self.run_page(ticket).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch the current page again
    pub fn retry(&mut self) -> Result<PageOutcome> {
        let ticket = self.begin_retry();
        self.run_page(ticket)
    }

    fn run_page(&mut self, ticket: PageTicket) -> Result<PageOutcome> {
        let result = self.source.fetch_page(ticket.page());
        self.complete_page(ticket, result)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Open message `id`, marking it read if it was unread
    ///
    /// Returns the ticket for the body fetch, or `None` if `id` is not on
    /// the current page.
    pub fn begin_select(&mut self, id: &MessageId) -> Result<Option<DetailTicket>> {
        let Some(message) = self.messages.iter().find(|m| &m.id == id) else {
            debug!("Ignoring selection of message {} not on this page", id);
            return Ok(None);
        };

        if !message.read {
            self.actions.mark_read(&mut self.messages, id)?;
        }
        Ok(Some(self.detail.select(id.clone())))
    }

    /// Apply the result of a body fetch
    ///
    /// Returns false for a stale ticket. A failed fetch shows placeholder
    /// text and does not undo the read mark.
    pub fn complete_detail(
        &mut self,
        ticket: DetailTicket,
        result: Result<String, NetworkError>,
    ) -> bool {
        let body = result.as_ref().ok().cloned();
        if !self.detail.complete(&ticket, result) {
            return false;
        }

        if let Some(body) = body
            && let Some(message) = self.messages.iter_mut().find(|m| &m.id == ticket.id())
        {
            message.body = Some(body);
        }
        true
    }

    /// Open message `id` and fetch its body
    ///
    /// Returns false if `id` is not on the current page.
    pub fn select_message(&mut self, id: &MessageId) -> Result<bool> {
        let Some(ticket) = self.begin_select(id)? else {
            return Ok(false);
        };
        let result = self.source.fetch_body(ticket.id());
        self.complete_detail(ticket, result);
        Ok(true)
    }

    /// Close the detail pane
    pub fn go_back(&mut self) {
        self.detail.deselect();
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Toggle favorite on `id`; `None` if it is not on the current page
    pub fn toggle_favorite(&mut self, id: &MessageId) -> Result<Option<bool>> {
        self.actions.toggle_favorite(&mut self.messages, id)
    }

    /// Mark `id` read; false if it is not on the current page
    pub fn mark_read(&mut self, id: &MessageId) -> Result<bool> {
        self.actions.mark_read(&mut self.messages, id)
    }

    /// Discard every stored edit and show the current page as fetched
    pub fn reset_overrides(&mut self) -> Result<()> {
        self.actions.reset(&mut self.messages, &self.raw)
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Messages shown under the current filter
    pub fn visible(&self) -> Vec<&Message> {
        filter_messages(&self.messages, self.filter)
    }

    /// The canonical list for the current page, unfiltered
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn page_state(&self) -> &PageState {
        self.pager.state()
    }

    pub fn can_go_next(&self) -> bool {
        self.pager.can_go_next()
    }

    pub fn can_go_previous(&self) -> bool {
        self.pager.can_go_previous()
    }

    pub fn selection(&self) -> &Selection {
        self.detail.selection()
    }

    /// The canonical message open in the detail pane, if still on this page
    pub fn selected_message(&self) -> Option<&Message> {
        self.detail.selected_id().and_then(|id| self.message(id))
    }

    pub fn counts(&self) -> FilterCounts {
        count_by_mode(&self.messages)
    }

    /// Everything the presentation layer renders, in one value
    pub fn snapshot(&self) -> InboxSnapshot {
        InboxSnapshot {
            page: self.page_state().clone(),
            filter: self.filter,
            counts: self.counts(),
            messages: self.visible().into_iter().cloned().collect(),
            selection: self.selection().clone(),
            can_go_next: self.can_go_next(),
            can_go_previous: self.can_go_previous(),
        }
    }
}
