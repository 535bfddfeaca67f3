use super::{check_schema, AppState, StateStore};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// State kept in a pretty-printed JSON file.
///
/// A missing file reads as the default state. Writes go through a temp file
/// in the same directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }
        let bytes =
            fs::read(&self.path).with_context(|| format!("read state {}", self.path.display()))?;
        let state: AppState = serde_json::from_slice(&bytes).context("parse state JSON")?;
        check_schema(&state)?;
        Ok(state)
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent).context("create state dir")?;
        let text = serde_json::to_string_pretty(state).context("serialize state")?;
        let mut temp = tempfile::NamedTempFile::new_in(parent).context("create temp state file")?;
        temp.write_all(text.as_bytes())
            .context("write temp state file")?;
        temp.persist(&self.path)
            .with_context(|| format!("write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "state saved");
        Ok(())
    }
}

/// In-process store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<AppState>,
}

impl MemoryStore {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<AppState> {
        let guard = self
            .state
            .lock()
            .map_err(|_| anyhow!("state lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        check_schema(state)?;
        let mut guard = self
            .state
            .lock()
            .map_err(|_| anyhow!("state lock poisoned"))?;
        *guard = state.clone();
        Ok(())
    }
}
