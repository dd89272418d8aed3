//! User settings
//!
//! Read from ~/.config/ghvault/config.yaml. A missing file means defaults.

use crate::paths::Paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tier a login writes to when no flag says otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTier {
    /// OS keychain / credential manager / secret service
    #[default]
    Vault,
    /// Owner-only plaintext file under the config directory
    File,
}

/// ghvault settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default storage tier for `login`
    #[serde(default)]
    pub storage: StorageTier,
}

impl Settings {
    /// Load settings from the default location
    pub fn load(paths: &Paths) -> Result<Self> {
        Self::load_from(&paths.settings_file())
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    /// Whether a login should bypass the vault unless told otherwise
    pub fn prefers_file(&self) -> bool {
        self.storage == StorageTier::File
    }
}
