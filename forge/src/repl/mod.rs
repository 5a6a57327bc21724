//! Terminal front end: form prompts and the interview loop

pub mod form;
mod session;

pub use form::{FormInput, LineReader};
pub use session::{InterviewRepl, SlashCommand};
