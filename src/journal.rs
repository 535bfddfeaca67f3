//! Journal entries and their attachments.
//!
//! Entries are display records: whatever shape is already stored is
//! accepted, and only the identifiers used for lookups are checked.
use crate::enhance::EnhancementResult;
use crate::mood::{self, Mood};
use crate::state::AppState;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "mood::deserialize_lenient")]
    pub mood: Option<Mood>,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A file stored in the object store and linked to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Object-store path returned by upload.
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: String,
}

/// Create an entry and return its id.
pub fn add_entry(
    state: &mut AppState,
    title: &str,
    content: &str,
    mood: Option<Mood>,
    now: DateTime<Utc>,
) -> String {
    let base = format!("entry-{}", now.timestamp_millis());
    let mut id = base.clone();
    let mut suffix = 1;
    while state.journal_entries.iter().any(|entry| entry.id == id) {
        suffix += 1;
        id = format!("{base}-{suffix}");
    }
    state.journal_entries.push(JournalEntry {
        id: id.clone(),
        title: title.to_string(),
        content: content.to_string(),
        mood,
        created_at: now,
        updated_at: now,
        attachments: Vec::new(),
    });
    tracing::info!(%id, "journal entry added");
    id
}

/// Entries newest first.
pub fn list_entries(state: &AppState) -> Vec<&JournalEntry> {
    let mut entries: Vec<&JournalEntry> = state.journal_entries.iter().collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    entries
}

pub fn find_entry<'a>(state: &'a AppState, id: &str) -> Result<&'a JournalEntry> {
    state
        .journal_entries
        .iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| anyhow!("no journal entry {id:?}"))
}

fn find_entry_mut<'a>(state: &'a mut AppState, id: &str) -> Result<&'a mut JournalEntry> {
    state
        .journal_entries
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or_else(|| anyhow!("no journal entry {id:?}"))
}

pub fn delete_entry(state: &mut AppState, id: &str) -> Result<JournalEntry> {
    let index = state
        .journal_entries
        .iter()
        .position(|entry| entry.id == id)
        .ok_or_else(|| anyhow!("no journal entry {id:?}"))?;
    Ok(state.journal_entries.remove(index))
}

pub fn attach(
    state: &mut AppState,
    id: &str,
    attachment: Attachment,
    now: DateTime<Utc>,
) -> Result<()> {
    let entry = find_entry_mut(state, id)?;
    entry.attachments.retain(|existing| existing.path != attachment.path);
    entry.attachments.push(attachment);
    entry.updated_at = now;
    Ok(())
}

pub fn detach(state: &mut AppState, id: &str, path: &str, now: DateTime<Utc>) -> Result<Attachment> {
    let entry = find_entry_mut(state, id)?;
    let index = entry
        .attachments
        .iter()
        .position(|attachment| attachment.path == path)
        .ok_or_else(|| anyhow!("entry {id:?} has no attachment {path:?}"))?;
    entry.updated_at = now;
    Ok(entry.attachments.remove(index))
}

/// Store an enhancement on the entry; results carrying an error are ignored.
///
/// Returns whether the entry changed.
pub fn apply_enhancement(
    state: &mut AppState,
    id: &str,
    result: &EnhancementResult,
    now: DateTime<Utc>,
) -> Result<bool> {
    let entry = find_entry_mut(state, id)?;
    if result.error.is_some() {
        return Ok(false);
    }
    entry.title = result.title.clone();
    entry.content = result.content.clone();
    entry.updated_at = now;
    Ok(true)
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
