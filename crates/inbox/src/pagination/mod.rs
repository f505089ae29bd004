//! Page navigation state machine
//!
//! Tracks which page is shown, whether a fetch is in flight, and whether
//! the end of the list has been reached.

mod controller;

pub use controller::{PageController, PageState, PageStatus, PageTicket, Transition};
