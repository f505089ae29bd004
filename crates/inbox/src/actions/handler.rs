//! Action handler for message flag edits
//!
//! Coordinates between the override store and the canonical list.

use anyhow::Result;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{FlagPatch, Message, MessageId, MessageSummary, Override};
use crate::reconcile::{apply_override, reconcile};
use crate::storage::OverrideStore;

/// Handler for flag edits like favorite and mark-as-read
///
/// Every action is performed in two steps:
/// 1. Merge the change into the override store
/// 2. Apply the same change to the message in the canonical list
///
/// If step 1 fails the list is left untouched, so the store and the list
/// never disagree about a message once an action returns.
pub struct ActionHandler {
    store: Arc<dyn OverrideStore>,
}

impl ActionHandler {
    /// Create a new action handler
    pub fn new(store: Arc<dyn OverrideStore>) -> Self {
        Self { store }
    }

    /// Toggle the favorite flag of message `id`
    ///
    /// Returns the new value, or `None` if `id` is not in `messages` (in
    /// which case nothing is written).
    pub fn toggle_favorite(
        &self,
        messages: &mut [Message],
        id: &MessageId,
    ) -> Result<Option<bool>> {
        let Some(message) = messages.iter_mut().find(|m| &m.id == id) else {
            return Ok(None);
        };

        let new_favorite = !message.favorite;
        info!(
            "Marking message {} as {}",
            id,
            if new_favorite { "favorite" } else { "not favorite" }
        );

        self.write_through(message, FlagPatch::favorite(new_favorite))?;
        Ok(Some(message.favorite))
    }

    /// Mark message `id` as read
    ///
    /// Never marks a message unread. Returns false if `id` is not in
    /// `messages`.
    pub fn mark_read(&self, messages: &mut [Message], id: &MessageId) -> Result<bool> {
        let Some(message) = messages.iter_mut().find(|m| &m.id == id) else {
            return Ok(false);
        };

        info!("Marking message {} as read", id);
        self.write_through(message, FlagPatch::read(true))?;
        Ok(true)
    }

    /// Discard every stored edit and rebuild `messages` from `raw`
    ///
    /// Bodies already loaded for messages still on the page are kept.
    pub fn reset(&self, messages: &mut Vec<Message>, raw: &[MessageSummary]) -> Result<()> {
        let removed = self.store.count()?;
        self.store.remove_all()?;
        info!("Reset {} stored overrides", removed);

        let bodies: HashMap<MessageId, String> = messages
            .drain(..)
            .filter_map(|m| m.body.map(|body| (m.id, body)))
            .collect();

        *messages = reconcile(raw, &HashMap::new());
        for message in messages.iter_mut() {
            message.body = bodies.get(&message.id).cloned();
        }
        Ok(())
    }

    /// Merge `patch` into the store, then apply the same patch in memory
    fn write_through(&self, message: &mut Message, patch: FlagPatch) -> Result<()> {
        self.store.merge(&message.id, patch)?;
        apply_override(message, &Override::new(message.id.clone(), patch));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryOverrideStore;
    use anyhow::bail;
    use std::collections::HashMap;

    fn make_messages() -> Vec<Message> {
        vec![
            Message::from_summary(&MessageSummary::builder("1").build()),
            Message::from_summary(&MessageSummary::builder("2").read(true).build()),
        ]
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl OverrideStore for BrokenStore {
        fn get(&self, _id: &MessageId) -> Result<Option<Override>> {
            Ok(None)
        }
        fn get_all(&self) -> Result<HashMap<MessageId, Override>> {
            Ok(HashMap::new())
        }
        fn merge(&self, _id: &MessageId, _patch: FlagPatch) -> Result<()> {
            bail!("disk full")
        }
        fn remove_all(&self) -> Result<()> {
            bail!("disk full")
        }
        fn count(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_toggle_favorite_writes_through() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let handler = ActionHandler::new(store.clone());
        let mut messages = make_messages();
        let id = MessageId::new("1");

        assert_eq!(handler.toggle_favorite(&mut messages, &id).unwrap(), Some(true));
        assert!(messages[0].favorite);
        assert_eq!(store.get_all().unwrap()[&id].favorite, Some(true));

        assert_eq!(handler.toggle_favorite(&mut messages, &id).unwrap(), Some(false));
        assert!(!messages[0].favorite);
        assert_eq!(store.get(&id).unwrap().unwrap().favorite, Some(false));
    }

    #[test]
    fn test_toggle_favorite_absent_id_is_noop() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let handler = ActionHandler::new(store.clone());
        let mut messages = make_messages();
        let before = messages.clone();

        assert_eq!(
            handler
                .toggle_favorite(&mut messages, &MessageId::new("missing"))
                .unwrap(),
            None
        );
        assert_eq!(messages, before);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_mark_read_sets_true_only() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let handler = ActionHandler::new(store.clone());
        let mut messages = make_messages();

        assert!(handler.mark_read(&mut messages, &MessageId::new("1")).unwrap());
        assert!(messages[0].read);
        assert!(handler.mark_read(&mut messages, &MessageId::new("2")).unwrap());
        assert!(messages[1].read);

        let all = store.get_all().unwrap();
        assert_eq!(all[&MessageId::new("1")].read, Some(true));
        assert_eq!(all[&MessageId::new("1")].favorite, None);
    }

    #[test]
    fn test_mark_read_absent_id() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let handler = ActionHandler::new(store.clone());
        let mut messages = make_messages();

        assert!(!handler.mark_read(&mut messages, &MessageId::new("9")).unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_failed_write_leaves_list_untouched() {
        let handler = ActionHandler::new(Arc::new(BrokenStore));
        let mut messages = make_messages();
        let before = messages.clone();

        assert!(handler.toggle_favorite(&mut messages, &MessageId::new("1")).is_err());
        assert!(handler.mark_read(&mut messages, &MessageId::new("1")).is_err());
        assert_eq!(messages, before);
    }

    #[test]
    fn test_reset_restores_fetched_flags() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let handler = ActionHandler::new(store.clone());
        let raw = vec![
            MessageSummary::builder("1").build(),
            MessageSummary::builder("2").read(true).build(),
        ];
        let mut messages = reconcile(&raw, &HashMap::new());
        handler.toggle_favorite(&mut messages, &MessageId::new("1")).unwrap();
        handler.mark_read(&mut messages, &MessageId::new("1")).unwrap();
        messages[1].body = Some("<p>kept</p>".to_string());

        handler.reset(&mut messages, &raw).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert!(!messages[0].favorite);
        assert!(!messages[0].read);
        assert!(messages[1].read);
        assert_eq!(messages[1].body.as_deref(), Some("<p>kept</p>"));
    }
}
