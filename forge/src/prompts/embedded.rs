//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Interviewer system prompt
pub const INTERVIEW: &str = include_str!("../../prompts/interview.pmt");

/// Document generation system prompt
pub const GENERATE: &str = include_str!("../../prompts/generate.pmt");

/// Per-stage generation instruction
pub const SECTION: &str = include_str!("../../prompts/section.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "interview" => Some(INTERVIEW),
        "generate" => Some(GENERATE),
        "section" => Some(SECTION),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
