//! Pull a single JSON object out of raw model output
//!
//! Models wrap JSON in prose or code fences often enough that we take the
//! substring from the first `{` to the last `}` and parse only that.

use thiserror::Error;
use tracing::debug;

use crate::domain::InterviewTurnResult;

/// Raw model output could not be turned into a structured result
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no opening brace in model output")]
    NoOpeningBrace,

    #[error("no closing brace in model output")]
    NoClosingBrace,

    #[error("last closing brace comes before first opening brace")]
    Unbalanced,

    #[error("model output is not a valid interview turn: {0}")]
    Json(#[from] serde_json::Error),
}

/// Slice from the first `{` through the last `}` inclusive
pub fn extract_json_object(raw: &str) -> Result<&str, ExtractError> {
    debug!(raw_len = raw.len(), "extract_json_object: called");
    let start = raw.find('{').ok_or(ExtractError::NoOpeningBrace)?;
    let end = raw.rfind('}').ok_or(ExtractError::NoClosingBrace)?;
    if end < start {
        debug!(%start, %end, "extract_json_object: braces out of order");
        return Err(ExtractError::Unbalanced);
    }
    Ok(&raw[start..=end])
}

/// Extract and deserialize an interview turn from raw model output
pub fn parse_turn_result(raw: &str) -> Result<InterviewTurnResult, ExtractError> {
    debug!("parse_turn_result: called");
    let json = extract_json_object(raw)?;
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_surrounding_garbage() {
        let raw = "garbage {\"message\":\"hi\",\"isComplete\":false} trailing";
        let result = parse_turn_result(raw).unwrap();
        assert_eq!(result.message, "hi");
        assert!(!result.complete);
        assert!(result.form.is_none());
    }

    #[test]
    fn test_extracts_from_code_fence() {
        let raw = "```json\n{\"message\":\"ok\",\"form\":{\"fields\":[{\"id\":\"a\",\"label\":\"A\",\"type\":\"text\"}]}}\n```";
        let result = parse_turn_result(raw).unwrap();
        assert_eq!(result.form.unwrap().fields[0].id, "a");
    }

    #[test]
    fn test_nested_braces_use_outermost() {
        let raw = r#"{"a":{"b":1}}"#;
        assert_eq!(extract_json_object(raw).unwrap(), raw);
    }

    #[test]
    fn test_no_braces_is_error() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(ExtractError::NoOpeningBrace)
        ));
        assert!(matches!(parse_turn_result("no json here"), Err(ExtractError::NoOpeningBrace)));
    }

    #[test]
    fn test_missing_closing_brace_is_error() {
        assert!(matches!(extract_json_object("{ \"message\": "), Err(ExtractError::NoClosingBrace)));
    }

    #[test]
    fn test_reversed_braces_is_error() {
        assert!(matches!(extract_json_object("} then {"), Err(ExtractError::Unbalanced)));
    }

    #[test]
    fn test_missing_message_is_json_error() {
        assert!(matches!(parse_turn_result("{\"isComplete\":true}"), Err(ExtractError::Json(_))));
    }
}
