//! Tolerant JSON extraction from free-form oracle text. Ported from
//! `BaseAgent._extract_json` in the original Python implementation:
//! try a fenced code block, then the whole payload, then a brace-depth
//! scan for the first balanced `{...}`, stripping trailing commas before
//! a final retry. Any step that parses cleanly wins; if nothing recovers
//! a valid object, the caller falls back.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Extracts a JSON object from `text`, tolerating markdown fencing,
/// leading/trailing prose, and trailing commas.
#[must_use]
pub fn extract_json(text: &str) -> Option<Value> {
    if let Some(caps) = FENCE_RE.captures(text) {
        let candidate = caps.get(1).unwrap().as_str().trim();
        if let Ok(value) = serde_json::from_str(candidate) {
            return Some(value);
        }
    }

    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Some(value);
    }

    let start = text.find('{')?;
    let mut depth = 0i32;
    let mut end = None;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + offset + ch.len_utf8());
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end?;
    let candidate = &text[start..end];

    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }

    let cleaned = TRAILING_COMMA_RE.replace_all(candidate, "$1");
    serde_json::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_block() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks.";
        assert_eq!(extract_json(text), Some(json!({"a": 1})));
    }

    #[test]
    fn extracts_whole_payload() {
        assert_eq!(extract_json(r#"{"a": 1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn extracts_embedded_object_via_brace_scan() {
        let text = r#"Sure, here's the data: {"a": 1, "b": {"c": 2}} — hope that helps."#;
        assert_eq!(extract_json(text), Some(json!({"a": 1, "b": {"c": 2}})));
    }

    #[test]
    fn recovers_from_trailing_commas() {
        let text = r#"{"a": 1, "b": [1, 2,],}"#;
        assert_eq!(extract_json(text), Some(json!({"a": 1, "b": [1, 2]})));
    }

    #[test]
    fn returns_none_when_unrecoverable() {
        assert_eq!(extract_json("not json at all, sorry"), None);
    }

    #[test]
    fn idempotent_on_well_formed_json() {
        let value = json!({"nested": {"list": [1, 2, 3]}, "flag": true});
        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(extract_json(&serialized), Some(value));
    }
}
