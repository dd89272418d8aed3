//! Standard paths used by ghvault tools

use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "GHVAULT_CONFIG_DIR";

/// File name of the plaintext token fallback
const TOKEN_FILE: &str = "token";

/// File name of the user settings
const SETTINGS_FILE: &str = "config.yaml";

/// Standard ghvault paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory (~/.config/ghvault, or $GHVAULT_CONFIG_DIR)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("~/.config"))
                .join("ghvault"),
        };

        Self { config }
    }

    /// Paths rooted under a single directory (tests, sandboxes)
    pub fn rooted(root: &Path) -> Self {
        Self {
            config: root.join("config"),
        }
    }

    /// Plaintext token file used when no secure vault is available
    pub fn token_file(&self) -> PathBuf {
        self.config.join(TOKEN_FILE)
    }

    /// User settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config.join(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_layout() {
        let paths = Paths::rooted(Path::new("/tmp/ghvault-test"));
        assert_eq!(paths.token_file(), PathBuf::from("/tmp/ghvault-test/config/token"));
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/tmp/ghvault-test/config/config.yaml")
        );
    }

    #[test]
    fn test_default_is_tool_specific() {
        let paths = Paths::new();
        assert!(paths.token_file().ends_with(TOKEN_FILE));
        assert!(paths.settings_file().ends_with(SETTINGS_FILE));
    }
}
