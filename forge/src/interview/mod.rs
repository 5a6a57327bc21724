//! Interview progression
//!
//! The fixed stage table used when no live model is available, and the rule
//! for pulling a structured result out of raw model text.

mod extract;
mod stage;

pub use extract::{ExtractError, extract_json_object, parse_turn_result};
pub use stage::Stage;
