//! Integration tests for the inbox crate
//!
//! These tests drive a full session from fetched pages through
//! reconciliation, navigation, actions and selection.

use chrono::{TimeZone, Utc};
use inbox::models::{FlagPatch, Message, MessageId, MessageSummary, Override, Sender};
use inbox::query::{FilterMode, filter_messages};
use inbox::reconcile::reconcile;
use inbox::storage::{InMemoryOverrideStore, OverrideStore, SqliteOverrideStore};
use inbox::{
    Inbox, MailSource, NO_MORE_EMAILS, NetworkError, PageOutcome, PageStatus, SessionOptions,
    StaticSource,
};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to create test summaries
fn make_summary(id: &str, read: bool, favorite: bool) -> MessageSummary {
    MessageSummary::builder(id)
        .from(Sender::with_name("Test User", "test@example.com"))
        .subject(format!("Subject {}", id))
        .summary(format!("This is the preview for message {}", id))
        .received_at(Utc.timestamp_millis_opt(1_582_729_505_000).unwrap())
        .read(read)
        .favorite(favorite)
        .build()
}

/// Helper to create a source with `pages` full pages followed by an empty one
fn make_source(pages: u32) -> Arc<StaticSource> {
    let mut source = StaticSource::new();
    for page in 1..=pages {
        let base = (page - 1) * 2;
        source = source.with_page(
            page,
            vec![
                make_summary(&(base + 1).to_string(), false, false),
                make_summary(&(base + 2).to_string(), false, false),
            ],
        );
    }
    Arc::new(source)
}

fn overrides(entries: &[(&str, FlagPatch)]) -> HashMap<MessageId, Override> {
    entries
        .iter()
        .map(|(id, patch)| (MessageId::new(*id), Override::new(MessageId::new(*id), *patch)))
        .collect()
}

#[test]
fn test_merge_correctness() {
    let raw = vec![
        make_summary("1", false, false),
        make_summary("2", true, false),
        make_summary("3", false, true),
    ];
    let overrides = overrides(&[
        ("1", FlagPatch::read(true)),
        ("2", FlagPatch::favorite(true)),
        ("99", FlagPatch::read(true)),
    ]);

    let merged = reconcile(&raw, &overrides);

    for (summary, message) in raw.iter().zip(&merged) {
        let stored = overrides.get(&summary.id);
        let read = stored.and_then(|o| o.read).unwrap_or(summary.read);
        let favorite = stored.and_then(|o| o.favorite).unwrap_or(summary.favorite);
        assert_eq!(message.id, summary.id);
        assert_eq!(message.read, read);
        assert_eq!(message.favorite, favorite);
    }
}

#[test]
fn test_reconcile_idempotent() {
    let raw = vec![make_summary("1", false, false), make_summary("2", true, true)];
    let overrides = overrides(&[
        ("1", FlagPatch { read: Some(true), favorite: Some(true) }),
        ("2", FlagPatch::read(false)),
    ]);

    let once = reconcile(&raw, &overrides);
    let derived: Vec<MessageSummary> = once.iter().map(Message::to_summary).collect();
    let twice = reconcile(&derived, &overrides);

    assert_eq!(once, twice);
}

#[test]
fn test_overlay_scenario() {
    let source = Arc::new(StaticSource::new().with_page(1, vec![make_summary("1", false, false)]));
    let store = Arc::new(InMemoryOverrideStore::new());
    store.merge(&MessageId::new("1"), FlagPatch::favorite(true)).unwrap();

    let mut inbox = Inbox::new(source, store, SessionOptions::default());
    inbox.retry().unwrap();

    let messages = inbox.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id.as_str(), "1");
    assert!(!messages[0].read);
    assert!(messages[0].favorite);
}

#[test]
fn test_pagination_monotonic() {
    let source = make_source(5);
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source, store, SessionOptions::default());
    inbox.retry().unwrap();

    for n in 1..=4 {
        assert_eq!(inbox.next_page().unwrap(), Some(PageOutcome::Loaded(2)));
        assert_eq!(inbox.page_state().page_number, 1 + n);
    }
}

#[test]
fn test_empty_page_is_terminal() {
    let source = make_source(2);
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source.clone(), store, SessionOptions::default());

    assert_eq!(inbox.select_page(3).unwrap(), Some(PageOutcome::Empty));
    assert_eq!(inbox.page_state().status, PageStatus::Empty);
    assert_eq!(inbox.page_state().page_number, 3);
    assert_eq!(inbox.page_state().error_message.as_deref(), Some(NO_MORE_EMAILS));
    let before = inbox.messages().to_vec();

    assert_eq!(inbox.select_page(4).unwrap(), None);
    assert_eq!(inbox.next_page().unwrap(), None);
    assert_eq!(inbox.page_state().page_number, 3);
    assert_eq!(inbox.messages(), before.as_slice());
    assert_eq!(source.page_requests(), vec![3]);

    // Going back is still possible
    assert_eq!(inbox.previous_page().unwrap(), Some(PageOutcome::Loaded(2)));
    assert_eq!(inbox.page_state().page_number, 2);
}

#[test]
fn test_error_conflated_by_default() {
    let source = make_source(1);
    source.set_page(2, Err(NetworkError::Transport("connection reset".to_string())));
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source.clone(), store.clone(), SessionOptions::default());
    inbox.retry().unwrap();
    inbox.next_page().unwrap();

    assert_eq!(inbox.page_state().status, PageStatus::Error);
    assert_eq!(inbox.page_state().error_message.as_deref(), Some(NO_MORE_EMAILS));

    let options = SessionOptions {
        conflate_list_errors: false,
        ..SessionOptions::default()
    };
    let mut inbox = Inbox::new(source, store, options);
    inbox.select_page(2).unwrap();
    assert_ne!(inbox.page_state().error_message.as_deref(), Some(NO_MORE_EMAILS));
}

#[test]
fn test_retry_after_error() {
    let source = make_source(1);
    source.set_page(2, Err(NetworkError::Status(503)));
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source.clone(), store, SessionOptions::default());
    inbox.retry().unwrap();
    inbox.next_page().unwrap();
    assert!(!inbox.can_go_next());

    source.set_page(2, Ok(vec![make_summary("3", false, false)]));
    assert_eq!(inbox.retry().unwrap(), PageOutcome::Loaded(1));
    assert_eq!(inbox.page_state().page_number, 2);
    assert!(inbox.can_go_next());
}

#[test]
fn test_write_through_consistency() {
    let source = make_source(1);
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source, store.clone(), SessionOptions::default());
    inbox.retry().unwrap();
    let id = MessageId::new("2");

    for _ in 0..3 {
        let favorite = inbox.toggle_favorite(&id).unwrap().unwrap();
        assert_eq!(store.get_all().unwrap()[&id].favorite, Some(favorite));
        assert_eq!(inbox.message(&id).unwrap().favorite, favorite);
    }
}

#[test]
fn test_toggle_absent_id_is_noop() {
    let source = Arc::new(StaticSource::new().with_page(1, vec![make_summary("2", false, false)]));
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source, store.clone(), SessionOptions::default());
    inbox.retry().unwrap();
    let before = inbox.messages().to_vec();

    assert_eq!(inbox.toggle_favorite(&MessageId::new("1")).unwrap(), None);
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(inbox.messages(), before.as_slice());
}

#[test]
fn test_filter_purity() {
    let messages: Vec<Message> = reconcile(
        &[
            make_summary("1", true, false),
            make_summary("2", false, true),
            make_summary("3", true, true),
        ],
        &HashMap::new(),
    );
    let before = messages.clone();

    for mode in FilterMode::ALL_MODES {
        let first: Vec<Message> = filter_messages(&messages, mode).into_iter().cloned().collect();
        let second: Vec<Message> = filter_messages(&messages, mode).into_iter().cloned().collect();
        assert_eq!(first, second);
    }
    assert_eq!(messages, before);
}

#[test]
fn test_late_page_response_discarded() {
    let source = make_source(3);
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source.clone(), store, SessionOptions::default());

    let slow = inbox.begin_page(1).unwrap();
    let fast = inbox.begin_next().unwrap();
    assert_eq!(fast.page(), 2);

    inbox.complete_page(fast, source.fetch_page(2)).unwrap();
    assert_eq!(
        inbox.complete_page(slow, source.fetch_page(1)).unwrap(),
        PageOutcome::Stale
    );
    assert_eq!(inbox.page_state().page_number, 2);
    assert_eq!(inbox.messages()[0].id.as_str(), "3");
}

#[test]
fn test_late_body_discarded() {
    let source = Arc::new(
        StaticSource::new()
            .with_page(1, vec![make_summary("1", false, false), make_summary("2", false, false)])
            .with_body("1", "one")
            .with_body("2", "two"),
    );
    let store = Arc::new(InMemoryOverrideStore::new());
    let mut inbox = Inbox::new(source.clone(), store, SessionOptions::default());
    inbox.retry().unwrap();

    let first = inbox.begin_select(&MessageId::new("1")).unwrap().unwrap();
    let second = inbox.begin_select(&MessageId::new("2")).unwrap().unwrap();

    assert!(inbox.complete_detail(second, source.fetch_body(&MessageId::new("2"))));
    assert!(!inbox.complete_detail(first, source.fetch_body(&MessageId::new("1"))));
    assert_eq!(inbox.selection().detail_body.as_deref(), Some("two"));
    assert_eq!(inbox.selected_message().unwrap().id.as_str(), "2");
}

#[test]
fn test_overrides_persist_across_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("overrides.sqlite");
    let source = make_source(1);

    {
        let store = Arc::new(SqliteOverrideStore::new(&db_path).unwrap());
        let mut inbox = Inbox::new(source.clone(), store, SessionOptions::default());
        inbox.retry().unwrap();
        inbox.toggle_favorite(&MessageId::new("1")).unwrap();
        inbox.select_message(&MessageId::new("2")).unwrap();
    }

    let store = Arc::new(SqliteOverrideStore::new(&db_path).unwrap());
    let mut inbox = Inbox::new(source, store, SessionOptions::default());
    inbox.retry().unwrap();

    let first = inbox.message(&MessageId::new("1")).unwrap();
    assert!(first.favorite);
    assert!(!first.read);
    let second = inbox.message(&MessageId::new("2")).unwrap();
    assert!(second.read);
    assert!(!second.favorite);
}

#[test]
fn test_start_page_option() {
    let source = make_source(3);
    let store = Arc::new(InMemoryOverrideStore::new());
    let options = SessionOptions {
        start_page: 2,
        ..SessionOptions::default()
    };
    let mut inbox = Inbox::new(source.clone(), store, options);

    inbox.retry().unwrap();
    assert_eq!(inbox.page_state().page_number, 2);
    assert_eq!(source.page_requests(), vec![2]);
    assert!(inbox.can_go_previous());
}
