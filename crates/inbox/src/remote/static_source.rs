//! Scripted in-memory message source
//!
//! Serves pre-loaded pages and bodies. Used by tests and for running the
//! driver without network access.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use super::source::MailSource;
use crate::error::NetworkError;
use crate::models::{MessageId, MessageSummary};

/// In-memory implementation of MailSource
///
/// Pages that were never scripted come back empty, like a real API past its
/// last page. Bodies that were never scripted fail with status 404.
#[derive(Default)]
pub struct StaticSource {
    pages: RwLock<HashMap<u32, Result<Vec<MessageSummary>, NetworkError>>>,
    bodies: RwLock<HashMap<MessageId, Result<String, NetworkError>>>,
    page_requests: Mutex<Vec<u32>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the messages returned for `page`
    pub fn with_page(self, page: u32, messages: Vec<MessageSummary>) -> Self {
        self.set_page(page, Ok(messages));
        self
    }

    /// Script the body returned for `id`
    pub fn with_body(self, id: impl Into<MessageId>, body: impl Into<String>) -> Self {
        self.set_body(id.into(), Ok(body.into()));
        self
    }

    /// Replace what `page` returns, including failures
    pub fn set_page(&self, page: u32, result: Result<Vec<MessageSummary>, NetworkError>) {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(page, result);
        }
    }

    /// Replace what the body of `id` returns, including failures
    pub fn set_body(&self, id: MessageId, result: Result<String, NetworkError>) {
        if let Ok(mut bodies) = self.bodies.write() {
            bodies.insert(id, result);
        }
    }

    /// Pages requested so far, in call order
    pub fn page_requests(&self) -> Vec<u32> {
        self.page_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl MailSource for StaticSource {
    fn fetch_page(&self, page: u32) -> Result<Vec<MessageSummary>, NetworkError> {
        if let Ok(mut requests) = self.page_requests.lock() {
            requests.push(page);
        }

        let pages = self
            .pages
            .read()
            .map_err(|_| NetworkError::Transport("source lock poisoned".to_string()))?;
        pages.get(&page).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn fetch_body(&self, id: &MessageId) -> Result<String, NetworkError> {
        let bodies = self
            .bodies
            .read()
            .map_err(|_| NetworkError::Transport("source lock poisoned".to_string()))?;
        bodies
            .get(id)
            .cloned()
            .unwrap_or(Err(NetworkError::Status(404)))
    }
}
