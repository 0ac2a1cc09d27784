//! Per-workspace configuration

use crate::error::{KronosError, Result};
use crate::infrastructure::fs_util::write_atomic;
use crate::infrastructure::layout::{is_workspace, MARKER_DIR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.toml";

/// Quiet period before an editor change is saved
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub editor: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    pub created: DateTime<Utc>,
}

impl Config {
    /// Create a new config with default values
    pub fn new(created: DateTime<Utc>) -> Self {
        Config {
            editor: Self::detect_default_editor(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            created,
        }
    }

    /// Location of the config file inside a workspace
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(MARKER_DIR).join(CONFIG_FILE)
    }

    /// Load config from .kronos/config.toml in the given workspace.
    /// A workspace without a config file gets the defaults.
    pub fn load_from_dir(root: &Path) -> Result<Self> {
        if !is_workspace(root) {
            return Err(KronosError::InvalidWorkspace(root.to_path_buf()));
        }

        let config_path = Self::path_in(root);
        let contents = match fs::read_to_string(&config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::new(Utc::now()));
            }
            Err(e) => return Err(KronosError::Io(e)),
        };

        toml::from_str(&contents)
            .map_err(|e| KronosError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .kronos/config.toml in the given workspace
    pub fn save_to_dir(&self, root: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        write_atomic(&Self::path_in(root), &contents)?;

        Ok(())
    }

    /// Get the editor command, checking environment variables first
    pub fn get_editor(&self) -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| self.editor.clone())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn detect_default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }
}
