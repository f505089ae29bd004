//! Plain-text and JSON output of inbox snapshots

use anyhow::Result;
use inbox::{InboxSnapshot, Message, PageStatus};
use std::io::Write;

/// Characters of the summary shown in a list row
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Write one snapshot; JSON output is a single line
pub fn write_snapshot(
    out: &mut impl Write,
    format: OutputFormat,
    snapshot: &InboxSnapshot,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(snapshot)?)?,
        OutputFormat::Text => write!(out, "{}", snapshot_text(snapshot))?,
    }
    out.flush()?;
    Ok(())
}

/// Write a notice that is not part of the inbox state
pub fn write_notice(out: &mut impl Write, format: OutputFormat, notice: &str) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::json!({ "notice": notice }))?,
        OutputFormat::Text => writeln!(out, "{}", notice)?,
    }
    out.flush()?;
    Ok(())
}

pub fn snapshot_text(snapshot: &InboxSnapshot) -> String {
    let page = &snapshot.page;
    let counts = &snapshot.counts;
    let mut text = format!(
        "Page {} [{}]  filter: {}  (all {}, favorites {}, read {}, unread {})\n",
        page.page_number,
        status_label(page.status),
        snapshot.filter,
        counts.all,
        counts.favorites,
        counts.read,
        counts.unread,
    );

    if let Some(message) = &page.error_message {
        text.push_str(&format!("  {}\n", message));
    }
    if snapshot.messages.is_empty() && page.status == PageStatus::Loaded {
        text.push_str("  (no messages match this filter)\n");
    }
    for message in &snapshot.messages {
        text.push_str(&row(message));
    }

    if let Some(id) = &snapshot.selection.selected_id
        && snapshot.selection.is_open
    {
        text.push_str(&format!("--- message {} ---\n", id));
        match &snapshot.selection.detail_body {
            Some(body) => text.push_str(&format!("{}\n", body)),
            None => text.push_str("(loading)\n"),
        }
    }
    text
}

fn row(message: &Message) -> String {
    format!(
        "{}{} {:>4}  {}  {}  {}  {}\n",
        if message.favorite { '*' } else { ' ' },
        if message.read { ' ' } else { 'o' },
        message.id,
        message.received_at.format("%Y-%m-%d %H:%M"),
        message.from.display(),
        message.subject,
        message.preview(PREVIEW_CHARS),
    )
}

fn status_label(status: PageStatus) -> &'static str {
    match status {
        PageStatus::Idle => "idle",
        PageStatus::Loading => "loading",
        PageStatus::Loaded => "loaded",
        PageStatus::Empty => "empty",
        PageStatus::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox::{FilterCounts, FilterMode, MessageSummary, PageState, Selection, Sender};

    fn snapshot(messages: Vec<Message>) -> InboxSnapshot {
        InboxSnapshot {
            page: PageState {
                page_number: 2,
                status: PageStatus::Loaded,
                error: None,
                error_message: None,
            },
            filter: FilterMode::All,
            counts: FilterCounts {
                all: messages.len(),
                ..Default::default()
            },
            messages,
            selection: Selection::default(),
            can_go_next: true,
            can_go_previous: true,
        }
    }

    fn message(id: &str, favorite: bool) -> Message {
        Message::from_summary(
            &MessageSummary::builder(id)
                .from(Sender::with_name("Ada", "ada@example.com"))
                .subject("Hello")
                .summary("Short description")
                .favorite(favorite)
                .build(),
        )
    }

    #[test]
    fn test_text_rows() {
        let text = snapshot_text(&snapshot(vec![message("1", true), message("2", false)]));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Page 2 [loaded]  filter: all"));
        assert!(lines[1].starts_with("*o    1"));
        assert!(lines[1].contains("Hello"));
        assert!(lines[2].starts_with(" o    2"));
    }

    #[test]
    fn test_text_error_and_detail() {
        let mut snap = snapshot(Vec::new());
        snap.page.status = PageStatus::Empty;
        snap.page.error_message = Some(inbox::NO_MORE_EMAILS.to_string());
        snap.selection = Selection {
            selected_id: Some("9".into()),
            detail_body: None,
            is_open: true,
        };

        let text = snapshot_text(&snap);
        assert!(text.contains("[empty]"));
        assert!(text.contains("No more emails to load."));
        assert!(text.contains("--- message 9 ---\n(loading)"));
    }

    #[test]
    fn test_json_is_one_line() {
        let mut out = Vec::new();
        write_snapshot(&mut out, OutputFormat::Json, &snapshot(vec![message("1", false)])).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["page"]["status"], "loaded");
        assert_eq!(value["messages"][0]["id"], "1");
    }
}
