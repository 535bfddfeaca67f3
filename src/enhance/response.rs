//! Parsing of free-form model answers into a title/content draft.
//!
//! The model is asked for a bare JSON object but routinely wraps it in a
//! code fence or surrounds it with prose. Parsing is tiered:
//!
//! 1. **Strict**: strip an optional fence and parse the rest as one object.
//! 2. **Lenient**: only when step 1 does not decode, find the first decodable
//!    object embedded in the text, then fall back to pattern extraction of the
//!    two string fields.
use super::Draft;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static TITLE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""title"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("title pattern compiles")
});
static CONTENT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"content"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("content pattern compiles")
});

/// Parse a model answer, returning `None` when no strategy finds both fields.
///
/// The lenient tier only runs when the answer does not decode as JSON. A
/// decodable answer without a usable top-level `title` and `content` fails.
pub(crate) fn parse_enhancement(text: &str) -> Option<Draft> {
    let cleaned = strip_code_fences(text);
    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(reason = %err, "strict enhancement parse failed");
            return parse_lenient(text);
        }
    };
    let draft = draft_from_value(&value);
    if draft.is_none() {
        tracing::debug!("decoded answer is missing a non-empty title or content");
    }
    draft
}

fn parse_lenient(text: &str) -> Option<Draft> {
    if let Some(draft) = extract_embedded_object(text) {
        tracing::debug!("enhancement recovered from embedded JSON");
        return Some(draft);
    }
    let draft = extract_fields(text);
    if draft.is_some() {
        tracing::debug!("enhancement recovered by field extraction");
    }
    draft
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence if present.
pub(crate) fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    if let Some(first) = lines.first() {
        if first.trim_start().starts_with("```") {
            lines.remove(0);
        }
    }
    if let Some(last) = lines.last() {
        if last.trim_start().starts_with("```") {
            lines.pop();
        }
    }
    lines.join("\n").trim().to_string()
}

fn draft_from_value(value: &Value) -> Option<Draft> {
    let title = non_empty_str(value.get("title"))?;
    let content = non_empty_str(value.get("content"))?;
    Some(Draft {
        title: title.to_string(),
        content: content.to_string(),
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn extract_embedded_object(raw: &str) -> Option<Draft> {
    for (idx, ch) in raw.char_indices() {
        if ch != '{' {
            continue;
        }
        let mut deserializer = serde_json::Deserializer::from_str(&raw[idx..]);
        if let Ok(value) = Value::deserialize(&mut deserializer) {
            if let Some(draft) = draft_from_value(&value) {
                return Some(draft);
            }
        }
    }
    None
}

fn extract_fields(raw: &str) -> Option<Draft> {
    let title = capture_string(&TITLE_FIELD, raw)?;
    let content = capture_string(&CONTENT_FIELD, raw)?;
    Some(Draft { title, content })
}

fn capture_string(pattern: &Regex, raw: &str) -> Option<String> {
    let escaped = pattern.captures(raw)?.get(1)?.as_str();
    let text = unescape_json_string(escaped);
    if text.trim().is_empty() {
        return None;
    }
    Some(text)
}

fn unescape_json_string(escaped: &str) -> String {
    // Literal newlines are invalid inside JSON strings but common in model output.
    let normalized = escaped.replace('\r', "\\r").replace('\n', "\\n").replace('\t', "\\t");
    serde_json::from_str::<String>(&format!("\"{normalized}\""))
        .unwrap_or_else(|_| escaped.to_string())
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
