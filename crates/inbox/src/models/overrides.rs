//! Persisted user edits layered over fetched messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageId;

/// A partial set of flag changes to merge into a stored override
///
/// Fields left as `None` are not touched by a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPatch {
    pub read: Option<bool>,
    pub favorite: Option<bool>,
}

impl FlagPatch {
    pub fn read(read: bool) -> Self {
        Self {
            read: Some(read),
            favorite: None,
        }
    }

    pub fn favorite(favorite: bool) -> Self {
        Self {
            read: None,
            favorite: Some(favorite),
        }
    }

    /// True if the patch names no field
    pub fn is_empty(&self) -> bool {
        self.read.is_none() && self.favorite.is_none()
    }
}

/// A user's persisted edit for one message
///
/// May refer to a message that is not on the current page. Such entries are
/// kept and only take effect when the id shows up in a fetched page again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub id: MessageId,
    pub read: Option<bool>,
    pub favorite: Option<bool>,
    /// When the override was last written
    pub updated_at: DateTime<Utc>,
}

impl Override {
    /// Create an override holding just the patched fields
    pub fn new(id: MessageId, patch: FlagPatch) -> Self {
        Self {
            id,
            read: patch.read,
            favorite: patch.favorite,
            updated_at: Utc::now(),
        }
    }

    /// Merge a patch into this override, keeping fields the patch omits
    pub fn apply_patch(&mut self, patch: FlagPatch) {
        if let Some(read) = patch.read {
            self.read = Some(read);
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = Some(favorite);
        }
        self.updated_at = Utc::now();
    }
}
