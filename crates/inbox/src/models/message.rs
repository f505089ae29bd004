//! Message models: the raw summary returned by the list endpoint and the
//! reconciled message the UI displays

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a message within a fetched page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The sender of a message: an address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com")
    pub email: String,
}

impl Sender {
    /// Create a sender with just the address
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a sender with a display name
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Name to show in a list row, falling back to the address
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }

    /// Format the sender as "Name <email>"
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.email),
            _ => self.email.clone(),
        }
    }
}

/// A message summary exactly as the list endpoint returned it
///
/// `read` and `favorite` carry the source's defaults (false unless the
/// source supplies them); local edits are layered on by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: MessageId,
    pub from: Sender,
    pub subject: String,
    /// Short description shown under the subject
    pub summary: String,
    pub received_at: DateTime<Utc>,
    pub read: bool,
    pub favorite: bool,
}

impl MessageSummary {
    /// Create a new summary builder
    pub fn builder(id: impl Into<MessageId>) -> MessageSummaryBuilder {
        MessageSummaryBuilder::new(id.into())
    }
}

/// Builder for creating MessageSummary instances
pub struct MessageSummaryBuilder {
    id: MessageId,
    from: Option<Sender>,
    subject: String,
    summary: String,
    received_at: Option<DateTime<Utc>>,
    read: bool,
    favorite: bool,
}

impl MessageSummaryBuilder {
    fn new(id: MessageId) -> Self {
        Self {
            id,
            from: None,
            subject: String::new(),
            summary: String::new(),
            received_at: None,
            read: false,
            favorite: false,
        }
    }

    pub fn from(mut self, from: Sender) -> Self {
        self.from = Some(from);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = Some(received_at);
        self
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn build(self) -> MessageSummary {
        MessageSummary {
            id: self.id,
            from: self.from.unwrap_or_else(|| Sender::new("unknown@unknown.com")),
            subject: self.subject,
            summary: self.summary,
            received_at: self.received_at.unwrap_or(DateTime::UNIX_EPOCH),
            read: self.read,
            favorite: self.favorite,
        }
    }
}

/// A reconciled, display-ready message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from: Sender,
    pub subject: String,
    pub summary: String,
    pub received_at: DateTime<Utc>,
    pub read: bool,
    pub favorite: bool,
    /// Full body, present only after a successful detail fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Message {
    /// Build a message carrying the summary's own flags and no body
    pub fn from_summary(summary: &MessageSummary) -> Self {
        Self {
            id: summary.id.clone(),
            from: summary.from.clone(),
            subject: summary.subject.clone(),
            summary: summary.summary.clone(),
            received_at: summary.received_at,
            read: summary.read,
            favorite: summary.favorite,
            body: None,
        }
    }

    /// The summary form of this message, with its current flags
    pub fn to_summary(&self) -> MessageSummary {
        MessageSummary {
            id: self.id.clone(),
            from: self.from.clone(),
            subject: self.subject.clone(),
            summary: self.summary.clone(),
            received_at: self.received_at,
            read: self.read,
            favorite: self.favorite,
        }
    }

    /// Summary text truncated to `max_chars`, with an ellipsis when cut
    pub fn preview(&self, max_chars: usize) -> String {
        if self.summary.chars().count() > max_chars {
            let cut: String = self.summary.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            self.summary.clone()
        }
    }
}
