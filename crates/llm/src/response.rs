//! Reply decoding helpers.
//!
//! Models often wrap JSON in Markdown code fences even when asked not to.
//! These helpers remove every fence marker and decode what is left.

use serde::de::DeserializeOwned;

use crate::error::{LlmError, LlmResult};

/// Remove every "```json" and "```" marker from `text` and trim the result.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Decode model reply text as JSON.
///
/// Only well-formedness is checked here. The error keeps the untouched reply
/// so callers can log what the model actually said.
pub fn parse_json_text<T: DeserializeOwned>(text: &str) -> LlmResult<T> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::debug!(raw = %text, "Model reply is not valid JSON");
        LlmError::ResponseParse {
            reason: e.to_string(),
            raw: text.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_fenced_json_parses() {
        let text = "```json\n{\"a\":1}\n```";
        let value: Value = parse_json_text(text).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_plain_fence_parses() {
        let text = "```\n[1, 2, 3]\n```";
        let value: Value = parse_json_text(text).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_fences_removed_anywhere() {
        let text = "  Here you go ```json {\"ok\": true} ``` ";
        assert_eq!(strip_code_fences(text), "Here you go  {\"ok\": true}");
    }

    #[test]
    fn test_invalid_json_keeps_raw_text() {
        let err = parse_json_text::<Value>("not json").unwrap_err();
        match &err {
            LlmError::ResponseParse { raw, .. } => assert_eq!(raw, "not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
