//! Error types the engine needs to tell apart
//!
//! Storage and configuration failures travel as `anyhow::Error`; these typed
//! errors exist because paging and the detail pane react to them differently.

use thiserror::Error;

/// Message shown for any list fetch that produced no page
pub const NO_MORE_EMAILS: &str = "No more emails to load.";

/// A remote fetch (list page or message body) that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The request never produced a response (DNS, connect, TLS, I/O)
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server returned status {0}")]
    Status(u16),

    /// The response body was not the expected JSON
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Why the last list fetch did not produce a page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("failed to fetch page: {0}")]
    Network(#[from] NetworkError),

    /// The fetch succeeded but the page had no messages
    #[error("page has no messages")]
    EmptyResult,
}

impl PageError {
    /// Text for the list view
    ///
    /// With `conflate` set, both kinds read as the end of the list.
    pub fn user_message(&self, conflate: bool) -> String {
        if conflate {
            return NO_MORE_EMAILS.to_string();
        }
        match self {
            PageError::Network(_) => "Failed to fetch emails.".to_string(),
            PageError::EmptyResult => NO_MORE_EMAILS.to_string(),
        }
    }
}
