// src/slug/extract.rs
// Extraction of a structured value from raw completion text

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// First fenced block with an optional language tag. The body may not contain
// backticks.
static RE_CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_]*\n([^`]+)```").expect("valid regex"));

static RE_JSON_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*["\[{]|^\s*-?\d{1,16}(\.\d{1,17})?([Ee][+-]?\d+)?\s*$"#)
        .expect("valid regex")
});

/// Replace the text with the trimmed body of its first fenced code block,
/// or return it unchanged when there is none.
pub fn strip_code_fence(text: &str) -> &str {
    match RE_CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text,
    }
}

/// Loosely parse model output into a JSON value.
///
/// Recognizes quoted strings, `true`/`false`/`null`, numbers, objects and
/// arrays. Anything else, including empty input and malformed JSON, is
/// returned as a string.
pub fn parse_loose(text: &str) -> Value {
    if text.starts_with('"') && text.ends_with('"') && !text.contains('\\') {
        // A lone quote is both the first and the last character
        let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
        return Value::String(inner.to_string());
    }

    let trimmed = text.trim();
    if trimmed.len() <= 9 {
        match trimmed.to_lowercase().as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" | "undefined" => return Value::Null,
            _ => {}
        }
    }

    if !RE_JSON_SIGNATURE.is_match(text) {
        return Value::String(text.to_string());
    }

    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
