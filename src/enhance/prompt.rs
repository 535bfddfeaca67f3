//! Prompt assembly for journal enhancement.
use crate::completion::{ChatMessage, ChatRequest};

// Prompt templates loaded at compile time
const SYSTEM_PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/enhance_system.md"
));
const USER_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/enhance_user.md"
));

/// Build the completion request for one entry.
pub(crate) fn build_request(title: &str, content: &str) -> ChatRequest {
    let user = render(USER_TEMPLATE, &[("title", title), ("content", content)]);
    ChatRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT.trim()),
        ChatMessage::user(user),
    ])
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Values are inserted verbatim, so braces inside user text are never
/// re-expanded.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
