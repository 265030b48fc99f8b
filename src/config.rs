//! Application settings persisted as JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Remote synchronization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Whether remote sync is active.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the sync server, e.g. `https://example.com/api`.
    #[serde(default)]
    pub base_url: String,
    /// Bearer token sent with every sync request.
    #[serde(default)]
    pub token: String,
}

/// Top-level settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Ignoring malformed config {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Writes settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Default location of the config file, `<config_dir>/rookery/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("rookery");
    Ok(dir.join("config.json"))
}
