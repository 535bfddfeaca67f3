//! User-visible notifications raised by the enhancement pipeline.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Error,
}

/// A short message meant for the person writing the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sink for toasts; the host decides how they are shown.
pub trait Notifier {
    fn notify(&self, toast: &Toast);
}

/// Routes toasts into the log only.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: &Toast) {
        tracing::warn!(title = %toast.title, message = %toast.message, "toast");
    }
}

/// Prints toasts on stderr for terminal use.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, toast: &Toast) {
        let label = match toast.level {
            ToastLevel::Info => "info",
            ToastLevel::Error => "error",
        };
        eprintln!("[{label}] {}: {}", toast.title, toast.message);
    }
}
