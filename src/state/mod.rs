//! Persisted application state.
//!
//! Everything the app remembers between runs lives in one typed [`AppState`]
//! document. Callers read and write it through a [`StateStore`] so they never
//! touch the backing file directly.
mod paths;
mod store;

pub use paths::DataPaths;
pub use store::{JsonFileStore, MemoryStore};

use crate::auth::{AuthMethod, Enrollment, PinCredential};
use crate::greeting::Language;
use crate::journal::JournalEntry;
use crate::stats::SessionRecord;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Current schema version for `state.json`.
pub const STATE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub schema_version: u32,

    #[serde(default)]
    pub sessions: Vec<SessionRecord>,

    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,

    #[serde(default)]
    pub language: Language,

    /// How the journal is unlocked.
    #[serde(default)]
    pub auth_method: AuthMethod,

    #[serde(default)]
    pub enrollment: Enrollment,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_credential: Option<PinCredential>,

    /// Consecutive wrong PINs since the last successful unlock.
    #[serde(default)]
    pub failed_attempts: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            sessions: Vec::new(),
            journal_entries: Vec::new(),
            language: Language::default(),
            auth_method: AuthMethod::default(),
            enrollment: Enrollment::default(),
            pin_credential: None,
            failed_attempts: 0,
        }
    }
}

/// Read/write access to the persisted state document.
pub trait StateStore {
    fn load(&self) -> Result<AppState>;
    fn save(&self, state: &AppState) -> Result<()>;
}

/// Load, apply `change`, and save only if `change` succeeded.
pub fn update<S, T, F>(store: &S, change: F) -> Result<T>
where
    S: StateStore + ?Sized,
    F: FnOnce(&mut AppState) -> Result<T>,
{
    let mut state = store.load()?;
    let value = change(&mut state)?;
    store.save(&state)?;
    Ok(value)
}

pub(crate) fn check_schema(state: &AppState) -> Result<()> {
    if state.schema_version != STATE_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported state schema_version {}",
            state.schema_version
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
