//! Pulls a JSON object out of free-form model output.
//!
//! The model is asked for bare JSON but often wraps it in prose or a code fence. The
//! object is taken to span from the first `{` to the last `}`. Braces in the
//! surrounding prose break this, and no repair is attempted: such replies count as
//! unparseable.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Returns the text between the first `{` and the last `}` inclusive, if any.
pub fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Parses the embedded JSON object, or `None` when there is none or it is malformed.
pub fn parse_json_object(raw: &str) -> Option<Value> {
    let candidate = json_object_span(raw)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("JSON decode error in model response: {}", e);
            None
        }
    }
}

/// Like [`parse_json_object`], then deserializes into `T`. A shape mismatch is also `None`.
pub fn parse_object_as<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let value = parse_json_object(raw)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Model response does not match the expected schema: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn tolerates_surrounding_prose() {
        let raw = r#"Here you go: {"summary":"ok","riskFlags":[],"keyClauses":[]} Thanks"#;
        assert_eq!(
            parse_json_object(raw),
            Some(json!({"summary": "ok", "riskFlags": [], "keyClauses": []}))
        );
    }

    #[test]
    fn tolerates_code_fences() {
        let raw = "```json\n{\n  \"summary\": \"fenced\",\n  \"riskFlags\": []\n}\n```";
        assert_eq!(
            parse_json_object(raw),
            Some(json!({"summary": "fenced", "riskFlags": []}))
        );
    }

    #[test]
    fn nested_objects_span_to_last_brace() {
        let raw = r#"{"a": {"b": 1}, "c": [{"d": 2}]}"#;
        assert_eq!(json_object_span(raw), Some(raw));
        assert_eq!(parse_json_object(raw), Some(json!({"a": {"b": 1}, "c": [{"d": 2}]})));
    }

    #[test]
    fn no_braces_is_no_result() {
        assert_eq!(parse_json_object("I could not analyze this document."), None);
        assert_eq!(parse_json_object(""), None);
        assert_eq!(parse_json_object("} backwards {"), None);
    }

    #[test]
    fn malformed_json_is_no_result() {
        assert_eq!(parse_json_object("{summary: 'single quotes'}"), None);
        assert_eq!(parse_json_object(r#"{"summary": "cut off"#), None);
    }

    #[test]
    fn braces_in_prose_defeat_the_match() {
        // Known limitation of the first-to-last brace heuristic.
        let raw = r#"Use {placeholders} like this: {"summary": "ok"}"#;
        assert_eq!(parse_json_object(raw), None);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Summary {
        summary: String,
    }

    #[test]
    fn typed_parse() {
        let parsed: Option<Summary> = parse_object_as(r#"Result: {"summary": "typed"}"#);
        assert_eq!(parsed, Some(Summary { summary: "typed".to_string() }));

        let mismatched: Option<Summary> = parse_object_as(r#"{"title": "no summary"}"#);
        assert_eq!(mismatched, None);
    }
}
