//! Config management use case

use crate::application::AppContext;
use crate::error::{KronosError, Result};
use crate::infrastructure::Config;
use tracing::info;

const KEYS: &str = "editor, debounce_ms, created";

/// Service for reading and changing the active workspace's config
pub struct ConfigService<'a> {
    ctx: &'a AppContext,
}

impl<'a> ConfigService<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        ConfigService { ctx }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.ctx.active_config()?;

        match key {
            "editor" => Ok(config.editor),
            "debounce_ms" => Ok(config.debounce_ms.to_string()),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.ctx.active_config()?;

        match key {
            "editor" => {
                if value.trim().is_empty() {
                    return Err(KronosError::Config("Editor cannot be empty".to_string()));
                }
                config.editor = value.to_string();
            }
            "debounce_ms" => {
                config.debounce_ms = value.trim().parse().map_err(|_| {
                    KronosError::Config(format!(
                        "Invalid debounce_ms '{}': expected milliseconds",
                        value
                    ))
                })?;
            }
            "created" => {
                return Err(KronosError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => return Err(unknown_key(key)),
        }

        config.save_to_dir(self.ctx.active_root()?)?;
        info!(key, value, "Updated config");
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.ctx.active_config()
    }
}

fn unknown_key(key: &str) -> KronosError {
    KronosError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key, KEYS
    ))
}
