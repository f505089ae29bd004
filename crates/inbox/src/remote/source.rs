//! The fetch seam between the engine and the network

use crate::error::NetworkError;
use crate::models::{MessageId, MessageSummary};

/// A paginated source of message summaries and bodies
///
/// Each call is a single attempt; callers decide whether to try again.
pub trait MailSource: Send + Sync {
    /// Fetch page `page` (1-based), in the source's presentation order
    fn fetch_page(&self, page: u32) -> Result<Vec<MessageSummary>, NetworkError>;

    /// Fetch the full body of one message
    fn fetch_body(&self, id: &MessageId) -> Result<String, NetworkError>;
}
