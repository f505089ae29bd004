//! Storage trait definitions

use anyhow::Result;
use std::collections::HashMap;

use crate::models::{FlagPatch, MessageId, Override};

/// Trait for override storage operations
///
/// Keyed by message id. Entries are never pruned: an override for a message
/// that is no longer on screen stays until [`OverrideStore::remove_all`].
pub trait OverrideStore: Send + Sync {
    /// Get the override for one message
    fn get(&self, id: &MessageId) -> Result<Option<Override>>;

    /// Get every stored override, keyed by message id
    fn get_all(&self) -> Result<HashMap<MessageId, Override>>;

    /// Upsert the fields named in `patch` for `id`
    ///
    /// Fields the patch leaves out, and all other ids, are untouched.
    fn merge(&self, id: &MessageId, patch: FlagPatch) -> Result<()>;

    /// Delete every override
    fn remove_all(&self) -> Result<()>;

    /// Count stored overrides
    fn count(&self) -> Result<usize>;
}
