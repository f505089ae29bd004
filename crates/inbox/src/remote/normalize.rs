//! Mail API response normalization
//!
//! Converts API responses to domain models.

use chrono::{DateTime, TimeZone, Utc};
use log::warn;

use super::api::ApiEmail;
use crate::models::{MessageId, MessageSummary, Sender};

/// Normalize an API email to a MessageSummary
///
/// Missing flags default to false. A missing or out-of-range date becomes
/// the Unix epoch so one bad record cannot fail the whole page.
pub fn normalize_email(email: ApiEmail) -> MessageSummary {
    let received_at = email
        .date
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(|| {
            warn!("Message {} has no usable date ({:?})", email.id, email.date);
            DateTime::UNIX_EPOCH
        });

    let name = email
        .from
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    MessageSummary {
        id: MessageId::new(email.id),
        from: Sender {
            name,
            email: email.from.email.trim().to_string(),
        },
        subject: email.subject,
        summary: email.short_description,
        received_at,
        read: email.read.unwrap_or(false),
        favorite: email.favorite.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::api::ApiSender;

    fn api_email(id: &str, date: Option<i64>) -> ApiEmail {
        ApiEmail {
            id: id.to_string(),
            from: ApiSender {
                email: " bounces@tech.dev ".to_string(),
                name: Some("bounces".to_string()),
            },
            date,
            subject: "Lorem Ipsum".to_string(),
            short_description: "Vestibulum sit amet".to_string(),
            read: None,
            favorite: None,
        }
    }

    #[test]
    fn test_normalize_email() {
        let summary = normalize_email(api_email("1", Some(1582729505000)));

        assert_eq!(summary.id.as_str(), "1");
        assert_eq!(summary.from, Sender::with_name("bounces", "bounces@tech.dev"));
        assert_eq!(summary.subject, "Lorem Ipsum");
        assert_eq!(summary.summary, "Vestibulum sit amet");
        assert_eq!(summary.received_at.timestamp_millis(), 1582729505000);
        assert!(!summary.read);
        assert!(!summary.favorite);
    }

    #[test]
    fn test_normalize_keeps_source_flags() {
        let mut email = api_email("1", Some(0));
        email.read = Some(true);
        email.favorite = Some(true);

        let summary = normalize_email(email);
        assert!(summary.read);
        assert!(summary.favorite);
    }

    #[test]
    fn test_missing_date_falls_back_to_epoch() {
        let summary = normalize_email(api_email("1", None));
        assert_eq!(summary.received_at, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_blank_name_is_dropped() {
        let mut email = api_email("1", Some(0));
        email.from.name = Some("  ".to_string());
        assert_eq!(normalize_email(email).from.name, None);
    }
}
