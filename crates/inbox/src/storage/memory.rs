//! In-memory storage implementation
//!
//! Used by tests and as a stand-in when no database path is configured.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::OverrideStore;
use crate::models::{FlagPatch, MessageId, Override};

/// In-memory implementation of OverrideStore
///
/// Uses a HashMap protected by an RwLock. Contents are lost on drop.
pub struct InMemoryOverrideStore {
    overrides: RwLock<HashMap<MessageId, Override>>,
}

impl InMemoryOverrideStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-populated with the given overrides
    pub fn with_overrides(overrides: impl IntoIterator<Item = Override>) -> Self {
        let map = overrides.into_iter().map(|o| (o.id.clone(), o)).collect();
        Self {
            overrides: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<MessageId, Override>>> {
        self.overrides
            .read()
            .map_err(|_| anyhow!("override store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<MessageId, Override>>> {
        self.overrides
            .write()
            .map_err(|_| anyhow!("override store lock poisoned"))
    }
}

impl Default for InMemoryOverrideStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OverrideStore for InMemoryOverrideStore {
    fn get(&self, id: &MessageId) -> Result<Option<Override>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn get_all(&self) -> Result<HashMap<MessageId, Override>> {
        Ok(self.read()?.clone())
    }

    fn merge(&self, id: &MessageId, patch: FlagPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut overrides = self.write()?;
        overrides
            .entry(id.clone())
            .and_modify(|existing| existing.apply_patch(patch))
            .or_insert_with(|| Override::new(id.clone(), patch));
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
