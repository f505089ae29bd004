//! Selection of the message opened in the detail pane

mod detail;

pub use detail::{DETAIL_ERROR_PLACEHOLDER, DetailController, DetailTicket, Selection};
