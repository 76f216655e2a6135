//! Lenient JSON extraction from free-form oracle responses.
//!
//! Oracles wrap JSON in prose and markdown fences. Extraction tries, in
//! order: a fenced code block, the whole trimmed text, the span between
//! the first `{` and the last `}`, then the span between the first `[`
//! and the last `]`.

use serde_json::Value;

use crate::error::{DataforgeError, Result};

/// Pull a JSON value out of an oracle response.
pub fn extract_json(text: &str) -> Result<Value> {
    let candidate = strip_code_fences(text);

    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Ok(value);
    }

    if let Some(value) = parse_span(candidate, '{', '}') {
        return Ok(value);
    }

    if let Some(value) = parse_span(candidate, '[', ']') {
        return Ok(value);
    }

    Err(DataforgeError::OracleFormat(format!(
        "no JSON found in response: {}",
        truncate(text, 80)
    )))
}

/// Strip a markdown code fence if the response carries one.
fn strip_code_fences(text: &str) -> &str {
    if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(str::trim)
            .unwrap_or(text)
    } else if text.contains("```") {
        text.split("```").nth(1).map(str::trim).unwrap_or(text)
    } else {
        text.trim()
    }
}

/// Parse the span between the first `open` and last `close` delimiter.
fn parse_span(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
