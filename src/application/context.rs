//! Shared state for the use cases: the workspace registry and the clock

use crate::domain::{Clock, SystemClock};
use crate::error::{KronosError, Result};
use crate::infrastructure::{Config, NoteStore, WorkspaceRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs to reach the active Kronosphere
pub struct AppContext {
    registry: WorkspaceRegistry,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Load the registry from `store_path`, or from the default location
    pub fn open(store_path: Option<PathBuf>) -> Result<Self> {
        let store_path = match store_path {
            Some(path) => path,
            None => WorkspaceRegistry::default_store_path()?,
        };
        Self::with_clock(store_path, Arc::new(SystemClock))
    }

    pub fn with_clock(store_path: PathBuf, clock: Arc<dyn Clock>) -> Result<Self> {
        let registry = WorkspaceRegistry::load(store_path, Arc::clone(&clock))?;
        Ok(AppContext { registry, clock })
    }

    pub fn registry(&self) -> &WorkspaceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WorkspaceRegistry {
        &mut self.registry
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Note store bound to whichever workspace is active
    pub fn notes(&self) -> NoteStore<'_> {
        NoteStore::new(&self.registry, self.clock.as_ref())
    }

    pub fn active_root(&self) -> Result<&Path> {
        self.registry
            .active()
            .map(|ws| ws.root_path.as_path())
            .ok_or(KronosError::NoActiveWorkspace)
    }

    /// Config of the active workspace
    pub fn active_config(&self) -> Result<Config> {
        Config::load_from_dir(self.active_root()?)
    }
}
