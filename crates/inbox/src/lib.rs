//! Inbox crate - List reconciliation and pagination for a remote mailbox
//!
//! This crate provides the engine behind a paginated email list:
//! - Domain models (Message, MessageSummary, Override)
//! - A client for the paginated mail API plus a scripted test source
//! - A persistent store for local read/favorite edits
//! - Reconciliation of fetched pages with stored edits
//! - Page navigation with stale-response protection
//! - Filter views and write-through flag actions
//! - Detail pane selection with lazy body loading
//!
//! It has no UI dependencies; drivers talk to it through [`Inbox`].

pub mod actions;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod query;
pub mod reconcile;
pub mod remote;
pub mod selection;
pub mod session;
pub mod storage;

pub use actions::ActionHandler;
pub use config::InboxConfig;
pub use error::{NO_MORE_EMAILS, NetworkError, PageError};
pub use models::{FlagPatch, Message, MessageId, MessageSummary, Override, Sender};
pub use pagination::{PageController, PageState, PageStatus, PageTicket, Transition};
pub use query::{FilterCounts, FilterMode, count_by_mode, filter_messages};
pub use reconcile::{apply_override, reconcile};
pub use remote::{MailApiClient, MailSource, StaticSource, normalize_email};
pub use selection::{DETAIL_ERROR_PLACEHOLDER, DetailController, DetailTicket, Selection};
pub use session::{Inbox, InboxSnapshot, PageOutcome, SessionOptions};
pub use storage::{InMemoryOverrideStore, OverrideStore, SqliteOverrideStore};
