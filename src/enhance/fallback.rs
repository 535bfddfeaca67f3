//! Offline reformatting used when the model path fails.
//!
//! Behavior is defined by the literal thresholds and phrase lists below;
//! change them only together with the tests.
use super::Draft;
use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Titles treated as "no title given" (compared case-insensitively).
const GENERIC_TITLES: [&str; 5] = ["untitled", "new entry", "journal entry", "my entry", "entry"];
/// Words that mark a title as already reflective.
const MARKER_WORDS: [&str; 2] = ["journey", "reflection"];
const TITLE_PREFIX: &str = "My Journey: ";

const INTRO_MIN_CHARS: usize = 30;
const CLOSING_MIN_CHARS: usize = 100;
const INTRO: &str = "Today I took some time to reflect on my thoughts and experiences.";
const CLOSINGS: [&str; 2] = [
    "Looking back, I can see how these moments have shaped my perspective.",
    "I'm grateful for the opportunity to pause, reflect, and grow.",
];

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("blank line pattern compiles"));

/// Produces a draft without the remote model.
pub trait Formatter {
    fn format(&self, title: &str, content: &str, today: NaiveDate) -> Result<Draft>;
}

/// The built-in paragraph formatter. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFormatter;

impl Formatter for HeuristicFormatter {
    fn format(&self, title: &str, content: &str, today: NaiveDate) -> Result<Draft> {
        Ok(Draft {
            title: synthesize_title(title, today),
            content: synthesize_content(content),
        })
    }
}

pub fn synthesize_title(title: &str, today: NaiveDate) -> String {
    let trimmed = title.trim();
    let lowered = trimmed.to_lowercase();
    if trimmed.is_empty() || GENERIC_TITLES.contains(&lowered.as_str()) {
        return format!("Reflections on {}", today.format("%B %-d"));
    }
    if MARKER_WORDS.iter().any(|word| lowered.contains(word)) {
        return trimmed.to_string();
    }
    format!("{TITLE_PREFIX}{trimmed}")
}

pub fn synthesize_content(content: &str) -> String {
    let length = content.chars().count();
    let mut paragraphs: Vec<String> = Vec::new();
    if length > INTRO_MIN_CHARS {
        paragraphs.push(INTRO.to_string());
    }
    let normalized = content.replace("\r\n", "\n");
    paragraphs.extend(
        BLANK_LINE
            .split(&normalized)
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(str::to_string),
    );
    if length > CLOSING_MIN_CHARS {
        paragraphs.extend(CLOSINGS.iter().map(|closing| closing.to_string()));
    }
    if paragraphs.is_empty() {
        return "<p></p>".to_string();
    }
    paragraphs
        .iter()
        .map(|paragraph| format!("<p>{paragraph}</p>"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
