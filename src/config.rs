//! Application configuration.
//!
//! Resolved in priority order:
//! 1. `MJ_*` environment variables
//! 2. `config.json` (from `--config` or the platform config dir)
//! 3. Compiled defaults
//!
//! The completion model, temperature, and token ceiling are fixed and not
//! configurable here.
use crate::completion::DEFAULT_COMPLETION_URL;
use crate::greeting::Language;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const APP_DIR: &str = "mindful-journal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub schema_version: u32,

    /// Where state, attachments, and logs live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_completion_url")]
    pub completion_url: String,

    /// Bearer credential for the completion endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the language stored in state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

fn default_completion_url() -> String {
    DEFAULT_COMPLETION_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            data_dir: None,
            completion_url: default_completion_url(),
            api_key: None,
            language: None,
        }
    }
}

impl AppConfig {
    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> AppConfig {
        AppConfig {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// Load config from an explicit path, or from the default location if present.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(AppConfig::default()),
        },
    };
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: AppConfig = serde_json::from_slice(&bytes).context("parse config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply `MJ_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
    if let Some(dir) = set("MJ_DATA_DIR") {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(url) = set("MJ_COMPLETION_URL") {
        config.completion_url = url;
    }
    if let Some(key) = set("MJ_API_KEY") {
        config.api_key = Some(key);
    }
    if let Some(code) = set("MJ_LANGUAGE") {
        config.language = Some(Language::from_code(&code));
    }
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    let url = config.completion_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(anyhow!(
            "completion_url must be an http(s) URL (got {url:?})"
        ));
    }
    Ok(())
}

/// Resolve the data directory, falling back to the platform data dir.
pub fn resolve_data_dir(config: &AppConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| anyhow!("no data directory available; set MJ_DATA_DIR"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
