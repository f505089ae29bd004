//! Overlay of stored overrides onto a fetched page

use log::warn;
use std::collections::{HashMap, HashSet};

use crate::models::{Message, MessageId, MessageSummary, Override};

/// Merge a fetched page with stored overrides into the canonical list
///
/// Keeps fetch order. For each summary, the override's `read` and
/// `favorite` replace the fetched values when set; otherwise the fetched
/// values stand. Overrides for ids not on the page are ignored. A repeated
/// id keeps its first occurrence.
pub fn reconcile(raw: &[MessageSummary], overrides: &HashMap<MessageId, Override>) -> Vec<Message> {
    let mut seen: HashSet<&MessageId> = HashSet::with_capacity(raw.len());
    let mut messages = Vec::with_capacity(raw.len());

    for summary in raw {
        if !seen.insert(&summary.id) {
            warn!("Dropping duplicate message {} from fetched page", summary.id);
            continue;
        }

        let mut message = Message::from_summary(summary);
        if let Some(ov) = overrides.get(&summary.id) {
            apply_override(&mut message, ov);
        }
        messages.push(message);
    }

    messages
}

/// Apply the fields an override sets to one canonical message
pub fn apply_override(message: &mut Message, ov: &Override) {
    if let Some(read) = ov.read {
        message.read = read;
    }
    if let Some(favorite) = ov.favorite {
        message.favorite = favorite;
    }
}
