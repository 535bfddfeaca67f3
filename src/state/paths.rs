//! Typed paths into the data directory.
use std::path::{Path, PathBuf};

/// Locates the files owned by one data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `state.json` path.
    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Return the `attachments/` directory path.
    pub fn attachments_dir(&self) -> PathBuf {
        self.root.join("attachments")
    }

    /// Return the `enhance_log.jsonl` path.
    pub fn enhance_log_path(&self) -> PathBuf {
        self.root.join("enhance_log.jsonl")
    }
}
