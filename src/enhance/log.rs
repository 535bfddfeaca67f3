//! Audit log of enhancement runs.
//!
//! Entries are appended to `enhance_log.jsonl` in the data directory as
//! newline-delimited JSON:
//!
//! ```jsonl
//! {"schema_version":1,"ts":1707900000000,"outcome":"remote","duration_ms":2100,...}
//! {"schema_version":1,"ts":1707900060000,"outcome":"fallback","duration_ms":40,...}
//! ```
use super::{EnhanceOutcome, EnhancementRun};
use crate::state::DataPaths;
use crate::util::{now_epoch_ms, truncate_string};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

/// Current schema version for enhance_log.jsonl entries.
pub const ENHANCE_LOG_SCHEMA_VERSION: u32 = 1;

const TITLE_PREVIEW_BYTES: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceLogEntry {
    pub schema_version: u32,

    /// Unix timestamp in milliseconds when the run finished.
    pub ts: u64,

    pub outcome: EnhanceOutcome,

    pub duration_ms: u64,

    /// Length of the submitted content in characters.
    pub content_chars: usize,

    /// Title that was returned, truncated.
    pub title_preview: String,

    /// Why the remote path was skipped or the run failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnhanceLogEntry {
    pub fn from_run(run: &EnhancementRun, content_chars: usize) -> Self {
        Self {
            schema_version: ENHANCE_LOG_SCHEMA_VERSION,
            ts: now_epoch_ms(),
            outcome: run.outcome,
            duration_ms: run.duration.as_millis() as u64,
            content_chars,
            title_preview: truncate_string(&run.result.title, TITLE_PREVIEW_BYTES),
            error: run
                .result
                .error
                .clone()
                .or_else(|| run.remote_error.clone()),
        }
    }
}

/// Append one entry to the audit log.
pub fn append_enhance_log(paths: &DataPaths, entry: &EnhanceLogEntry) -> Result<()> {
    let log_path = paths.enhance_log_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).context("create data dir for enhance log")?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open enhance log for append: {}", log_path.display()))?;
    let line = serde_json::to_string(entry).context("serialize enhance log entry")?;
    writeln!(file, "{line}").context("write enhance log entry")?;
    Ok(())
}

/// Load all entries, skipping lines that no longer parse.
pub fn load_enhance_log(paths: &DataPaths) -> Result<Vec<EnhanceLogEntry>> {
    let log_path = paths.enhance_log_path();
    if !log_path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(&log_path)
        .with_context(|| format!("open enhance log: {}", log_path.display()))?;
    let mut entries = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read line {} of enhance log", line_num + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EnhanceLogEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(err) => tracing::warn!(
                line = line_num + 1,
                error = %err,
                "skip corrupt enhance log entry"
            ),
        }
    }
    Ok(entries)
}
