//! Journal entry enhancement.
//!
//! Turns an original title and content into an improved pair, preferring the
//! remote language model and guaranteeing a result when the network, the API,
//! or the answer format fails.
//!
//! # Pipeline
//!
//! 1. **Remote attempt**: one chat-completion request, no retry.
//! 2. **Parse**: strict JSON, then lenient recovery (see [`response`]).
//! 3. **Fallback**: the offline [`Formatter`] when 1 or 2 fails.
//! 4. **Terminal failure**: if the formatter errors, the caller's input is
//!    returned verbatim with `error` set and a toast is raised.
//!
//! Nothing in this module returns an `Err`; every path yields a usable
//! [`EnhancementResult`].
mod fallback;
mod log;
mod notify;
mod prompt;
mod response;

pub use fallback::{synthesize_content, synthesize_title, Formatter, HeuristicFormatter};
pub use log::{append_enhance_log, load_enhance_log, EnhanceLogEntry};
pub use notify::{LogNotifier, Notifier, StderrNotifier, Toast, ToastLevel};

use crate::completion::CompletionClient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Title/content pair returned to the caller.
///
/// When `error` is set, `title` and `content` are the caller's originals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Draft> for EnhancementResult {
    fn from(draft: Draft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            error: None,
        }
    }
}

/// Intermediate title/content produced by the model or the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

/// Which branch produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhanceOutcome {
    Remote,
    Fallback,
    Failed,
}

impl EnhanceOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            EnhanceOutcome::Remote => "remote",
            EnhanceOutcome::Fallback => "fallback",
            EnhanceOutcome::Failed => "failed",
        }
    }
}

/// A result together with how it was obtained.
#[derive(Debug, Clone)]
pub struct EnhancementRun {
    pub result: EnhancementResult,
    pub outcome: EnhanceOutcome,
    /// Why the remote branch was abandoned, when it was.
    pub remote_error: Option<String>,
    pub duration: Duration,
}

/// Runs the enhancement pipeline against injected collaborators.
pub struct Enhancer<'a> {
    client: &'a dyn CompletionClient,
    formatter: &'a dyn Formatter,
    notifier: &'a dyn Notifier,
}

impl<'a> Enhancer<'a> {
    /// Use the built-in formatter and log-only notifications.
    pub fn new(client: &'a dyn CompletionClient) -> Self {
        Self {
            client,
            formatter: &HeuristicFormatter,
            notifier: &LogNotifier,
        }
    }

    pub fn with_formatter(mut self, formatter: &'a dyn Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Enhance one entry. `today` dates synthesized titles.
    pub fn enhance_journal_entry(
        &self,
        title: &str,
        content: &str,
        today: NaiveDate,
    ) -> EnhancementResult {
        self.run(title, content, today).result
    }

    /// Like [`Enhancer::enhance_journal_entry`] but reports the branch taken.
    pub fn run(&self, title: &str, content: &str, today: NaiveDate) -> EnhancementRun {
        let start = Instant::now();
        tracing::info!(
            stage = "remote",
            title_chars = title.chars().count(),
            content_chars = content.chars().count(),
            "enhancing journal entry"
        );

        let remote_error = match self.remote_draft(title, content) {
            Ok(draft) => {
                tracing::info!(stage = "done", outcome = "remote", "enhancement complete");
                return EnhancementRun {
                    result: draft.into(),
                    outcome: EnhanceOutcome::Remote,
                    remote_error: None,
                    duration: start.elapsed(),
                };
            }
            Err(reason) => reason,
        };

        tracing::warn!(stage = "fallback", reason = %remote_error, "using local formatter");
        let (result, outcome) = match self.formatter.format(title, content, today) {
            Ok(draft) => {
                tracing::info!(stage = "done", outcome = "fallback", "enhancement complete");
                (draft.into(), EnhanceOutcome::Fallback)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(stage = "failed", error = %message, "enhancement failed");
                self.notifier.notify(&Toast::error(
                    "Enhancement failed",
                    format!("Your entry was left unchanged: {message}"),
                ));
                let result = EnhancementResult {
                    title: title.to_string(),
                    content: content.to_string(),
                    error: Some(message),
                };
                (result, EnhanceOutcome::Failed)
            }
        };
        EnhancementRun {
            result,
            outcome,
            remote_error: Some(remote_error),
            duration: start.elapsed(),
        }
    }

    fn remote_draft(&self, title: &str, content: &str) -> Result<Draft, String> {
        let request = prompt::build_request(title, content);
        let text = self
            .client
            .complete(&request)
            .map_err(|err| err.to_string())?;
        tracing::debug!(stage = "parse", response_bytes = text.len(), "completion received");
        response::parse_enhancement(&text)
            .ok_or_else(|| "model response did not contain a title and content".to_string())
    }
}
