//! Defensive cleanup of semi-structured model output.
//!
//! Models wrap JSON in Markdown fences despite instructions not to,
//! reasoning-tuned models prepend a trace between sentinel tags, and chatty
//! models pad the object with prose. Each step here tolerates one of those
//! habits.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::ProviderError;

fn reasoning_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("reasoning trace pattern"))
}

/// Strip a Markdown code fence wrapping, if present.
fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Extract and parse the outermost JSON object from raw model output.
///
/// Slices from the first `{` to the last `}`, so prose around the object is
/// tolerated. A payload with no object, or one that fails to parse, is a
/// provider failure, never a panic.
pub fn extract_json_payload(raw: &str) -> Result<Value, ProviderError> {
    let without_reasoning = reasoning_re().replace_all(raw, "");
    let cleaned = strip_code_fence(&without_reasoning);

    let start = cleaned.find('{').ok_or(ProviderError::MissingJson)?;
    let end = cleaned.rfind('}').ok_or(ProviderError::MissingJson)?;
    if end < start {
        return Err(ProviderError::MissingJson);
    }

    Ok(serde_json::from_str(&cleaned[start..=end])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fence() {
        let payload = "```json\n{\"a\":1}\n```";
        let value = extract_json_payload(payload).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_strips_bare_fence() {
        let payload = "```\n{\"safety_score\": 70}\n```";
        let value = extract_json_payload(payload).unwrap();
        assert_eq!(value["safety_score"], 70);
    }

    #[test]
    fn test_tolerates_surrounding_prose() {
        let payload = "Here is the result: {\"policy_type\":\"health\"} Hope this helps!";
        let value = extract_json_payload(payload).unwrap();
        assert_eq!(value["policy_type"], "health");
    }

    #[test]
    fn test_strips_reasoning_trace() {
        let payload = "<think>\nLet me analyze the waiting periods...\n</think>\n{\"risk_level\": \"high\"}";
        let value = extract_json_payload(payload).unwrap();
        assert_eq!(value["risk_level"], "high");
    }

    #[test]
    fn test_reasoning_then_fence_then_prose() {
        let payload = "<think>plan</think>Sure!\n```json\n{\"ok\": true}\n```";
        let value = extract_json_payload(payload).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_missing_object_is_failure() {
        let err = extract_json_payload("no json here").unwrap_err();
        assert!(matches!(err, ProviderError::MissingJson));
    }

    #[test]
    fn test_unparseable_object_is_failure() {
        let err = extract_json_payload("{not valid json}").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidJson(_)));
    }
}
