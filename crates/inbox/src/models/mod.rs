//! Domain models for inbox entities

mod message;
mod overrides;

pub use message::{Message, MessageId, MessageSummary, Sender};
pub use overrides::{FlagPatch, Override};
