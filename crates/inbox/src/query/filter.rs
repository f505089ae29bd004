//! Filtered views of the canonical list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Message;

/// Which messages the list view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Favorites,
    Read,
    Unread,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Favorites,
        FilterMode::Read,
        FilterMode::Unread,
    ];

    /// Whether `message` is shown under this mode
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Favorites => message.favorite,
            FilterMode::Read => message.read,
            FilterMode::Unread => !message.read,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Favorites => "favorites",
            FilterMode::Read => "read",
            FilterMode::Unread => "unread",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "favorites" | "favorite" | "starred" => Ok(FilterMode::Favorites),
            "read" => Ok(FilterMode::Read),
            "unread" => Ok(FilterMode::Unread),
            other => anyhow::bail!("Unknown filter mode: {}", other),
        }
    }
}

/// Messages visible under `mode`, in canonical order
///
/// Borrows from `messages` and never modifies them.
pub fn filter_messages(messages: &[Message], mode: FilterMode) -> Vec<&Message> {
    messages.iter().filter(|m| mode.matches(m)).collect()
}

/// Number of messages visible under each mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub favorites: usize,
    pub read: usize,
    pub unread: usize,
}

/// Count messages per filter mode in one pass
pub fn count_by_mode(messages: &[Message]) -> FilterCounts {
    messages.iter().fold(FilterCounts::default(), |mut counts, m| {
        counts.all += 1;
        if m.favorite {
            counts.favorites += 1;
        }
        if m.read {
            counts.read += 1;
        } else {
            counts.unread += 1;
        }
        counts
    })
}
