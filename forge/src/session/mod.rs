//! Conversation session and the driver that advances it
//!
//! A [`Session`] is a plain value. The [`InterviewDriver`] takes it by value
//! for each external trigger (start, form submission, free text) and hands
//! back either the advanced session or the untouched original with a
//! message for the user.

mod driver;
mod state;

pub use driver::{InterviewDriver, SessionError, StepOutcome};
pub use state::Session;
