//! Object storage for journal attachments.
//!
//! The app treats storage as an opaque capability: upload returns a path,
//! and that path is the only handle used afterwards. No retries are layered
//! on top of the backend.
use crate::journal::Attachment;
use crate::util::{now_epoch_ms, validate_relative_path};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait ObjectStore {
    /// Store `bytes` under a name derived from `name`; returns the object path.
    fn upload(&self, name: &str, bytes: &[u8]) -> Result<String>;
    fn url(&self, path: &str) -> Result<String>;
    fn download(&self, path: &str) -> Result<Vec<u8>>;
    /// Returns `false` when there was nothing to delete.
    fn delete(&self, path: &str) -> Result<bool>;
}

/// Object store rooted in a local directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        validate_relative_path(path, "object path")?;
        Ok(self.root.join(path))
    }
}

impl ObjectStore for LocalObjectStore {
    fn upload(&self, name: &str, bytes: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create {}", self.root.display()))?;
        let base = format!("{}-{}", now_epoch_ms(), sanitize_name(name));
        let mut path = base.clone();
        let mut counter = 1;
        while self.root.join(&path).exists() {
            counter += 1;
            path = format!("{counter}-{base}");
        }
        let full = self.root.join(&path);
        fs::write(&full, bytes).with_context(|| format!("write {}", full.display()))?;
        tracing::info!(%path, bytes = bytes.len(), "object uploaded");
        Ok(path)
    }

    fn url(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(anyhow::anyhow!("no stored object {path:?}"));
        }
        let absolute = full
            .canonicalize()
            .with_context(|| format!("resolve {}", full.display()))?;
        Ok(format!("file://{}", absolute.display()))
    }

    fn download(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        fs::read(&full).with_context(|| format!("read {}", full.display()))
    }

    fn delete(&self, path: &str) -> Result<bool> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full) {
            Ok(()) => {
                tracing::info!(%path, "object deleted");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("delete {}", full.display())),
        }
    }
}

/// Upload a local file and describe it as an attachment.
pub fn upload_file(store: &dyn ObjectStore, file: &Path) -> Result<Attachment> {
    let bytes = fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let path = store.upload(&name, &bytes)?;
    Ok(Attachment {
        path,
        content_type: content_type_for(&name).to_string(),
        size: bytes.len() as u64,
        name,
    })
}

/// Guess a MIME type from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Keep names to a portable character set.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
