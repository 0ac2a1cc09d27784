//! Workspace (Kronosphere) registry
//!
//! The registry is a small JSON document listing every known workspace and
//! which one is active:
//!
//! ```json
//! { "kronospheres": [ ... ], "currentKronosphere": { ... } }
//! ```
//!
//! Every mutation is written back before the call returns.

use crate::domain::Clock;
use crate::error::{KronosError, Result};
use crate::infrastructure::fs_util::write_atomic;
use crate::infrastructure::layout::{is_workspace, MARKER_DIR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Environment variable overriding the registry location
pub const STORE_ENV: &str = "KRONOS_STORE";

const STORE_FILE: &str = "kronospheres.json";

/// A registered storage root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub name: String,
    #[serde(alias = "path")]
    pub root_path: PathBuf,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_opened: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryState {
    #[serde(default)]
    kronospheres: Vec<Workspace>,
    #[serde(default)]
    current_kronosphere: Option<Workspace>,
}

/// Chooses a directory on behalf of the user. `None` means cancelled.
pub trait DirectoryPicker {
    fn pick_directory(&self, title: &str) -> Option<PathBuf>;
}

/// Picker answering with a directory chosen up front (e.g. a CLI argument)
#[derive(Debug, Clone, Default)]
pub struct ChosenDirectory(pub Option<PathBuf>);

impl DirectoryPicker for ChosenDirectory {
    fn pick_directory(&self, _title: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Registry of known workspaces, backed by a JSON file
pub struct WorkspaceRegistry {
    store_path: PathBuf,
    state: RegistryState,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for WorkspaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceRegistry")
            .field("store_path", &self.store_path)
            .field("state", &self.state)
            .finish()
    }
}

impl WorkspaceRegistry {
    /// Default registry location: `KRONOS_STORE`, else the user config dir
    pub fn default_store_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(STORE_ENV) {
            return Ok(PathBuf::from(path));
        }

        dirs::config_dir()
            .map(|dir| dir.join("kronos").join(STORE_FILE))
            .ok_or_else(|| {
                KronosError::Config(format!(
                    "Cannot determine a config directory; set {} to the registry file",
                    STORE_ENV
                ))
            })
    }

    /// Load the registry, starting empty when the store file does not exist
    pub fn load(store_path: PathBuf, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut state = match fs::read_to_string(&store_path) {
            Ok(contents) if contents.trim().is_empty() => RegistryState::default(),
            Ok(contents) => serde_json::from_str::<RegistryState>(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RegistryState::default(),
            Err(e) => return Err(KronosError::Io(e)),
        };

        // Older stores only tracked `currentKronosphere`
        if !state.kronospheres.iter().any(|w| w.active) {
            if let Some(current) = &state.current_kronosphere {
                for ws in &mut state.kronospheres {
                    ws.active = ws.root_path == current.root_path;
                }
            }
        }

        debug!(store = %store_path.display(), count = state.kronospheres.len(), "Loaded registry");
        Ok(WorkspaceRegistry {
            store_path,
            state,
            clock,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// The active workspace, if any
    pub fn active(&self) -> Option<&Workspace> {
        self.state.kronospheres.iter().find(|w| w.active)
    }

    /// Every registered workspace, in registration order
    pub fn list(&self) -> &[Workspace] {
        &self.state.kronospheres
    }

    /// Prompt for a directory, provision it and register it as active
    pub fn create_workspace(
        &mut self,
        name: &str,
        picker: &dyn DirectoryPicker,
    ) -> Result<Workspace> {
        let selected = picker
            .pick_directory("Select or Create a Kronosphere Directory")
            .ok_or(KronosError::NoDirectorySelected)?;

        fs::create_dir_all(selected.join(MARKER_DIR))?;
        let root = fs::canonicalize(&selected)?;

        let now = self.clock.now();
        let workspace = Workspace {
            name: name.to_string(),
            root_path: root,
            last_modified: now,
            last_opened: now,
            active: true,
        };

        let workspace = self.activate(workspace)?;
        info!(name = %workspace.name, root = %workspace.root_path.display(), "Created Kronosphere");
        Ok(workspace)
    }

    /// Prompt for a directory that already is a workspace and register it
    pub fn open_existing(&mut self, picker: &dyn DirectoryPicker) -> Result<Workspace> {
        let selected = picker
            .pick_directory("Open an existing Kronosphere")
            .ok_or(KronosError::NoDirectorySelected)?;

        if !is_workspace(&selected) {
            return Err(KronosError::InvalidWorkspace(selected));
        }
        let root = fs::canonicalize(&selected)?;

        let now = self.clock.now();
        let workspace = match self.find(&root) {
            Some(existing) => Workspace {
                last_opened: now,
                active: true,
                ..existing.clone()
            },
            None => Workspace {
                name: root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| root.display().to_string()),
                root_path: root.clone(),
                last_modified: now,
                last_opened: now,
                active: true,
            },
        };

        let workspace = self.activate(workspace)?;
        info!(root = %workspace.root_path.display(), "Opened Kronosphere");
        Ok(workspace)
    }

    /// Make the registered workspace at `root` the only active one
    pub fn set_active(&mut self, root: &Path) -> Result<Workspace> {
        let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let existing = self
            .find(&root)
            .ok_or_else(|| KronosError::WorkspaceNotRegistered(root.clone()))?;

        let workspace = Workspace {
            last_opened: self.clock.now(),
            active: true,
            ..existing.clone()
        };

        let workspace = self.activate(workspace)?;
        debug!(root = %workspace.root_path.display(), "Switched active Kronosphere");
        Ok(workspace)
    }

    fn find(&self, root: &Path) -> Option<&Workspace> {
        self.state.kronospheres.iter().find(|w| w.root_path == root)
    }

    /// Insert or replace `workspace`, deactivate all others, persist.
    /// The in-memory state only changes once the store was written.
    fn activate(&mut self, workspace: Workspace) -> Result<Workspace> {
        let mut next = self.state.clone();
        let mut replaced = false;
        for ws in &mut next.kronospheres {
            if ws.root_path == workspace.root_path {
                *ws = workspace.clone();
                replaced = true;
            } else {
                ws.active = false;
            }
        }
        if !replaced {
            next.kronospheres.push(workspace.clone());
        }
        next.current_kronosphere = Some(workspace.clone());

        self.persist(&next)?;
        self.state = next;
        Ok(workspace)
    }

    fn persist(&self, state: &RegistryState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state)?;
        write_atomic(&self.store_path, &contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ManualClock;
    use chrono::Duration;
    use tempfile::TempDir;

    fn registry(temp: &TempDir) -> WorkspaceRegistry {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        WorkspaceRegistry::load(temp.path().join("store").join(STORE_FILE), clock).unwrap()
    }

    fn pick(path: &Path) -> ChosenDirectory {
        ChosenDirectory(Some(path.to_path_buf()))
    }

    #[test]
    fn test_empty_registry() {
        let temp = TempDir::new().unwrap();
        let reg = registry(&temp);
        assert!(reg.active().is_none());
        assert!(reg.list().is_empty());
    }

    #[test]
    fn test_create_workspace_provisions_and_activates() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);
        let root = temp.path().join("journal");

        let ws = reg.create_workspace("Journal", &pick(&root)).unwrap();

        assert!(ws.active);
        assert_eq!(ws.name, "Journal");
        assert_eq!(ws.root_path, fs::canonicalize(&root).unwrap());
        assert!(root.join(".kronos").is_dir());
        assert_eq!(reg.active(), Some(&ws));
        assert!(reg.store_path().exists());
    }

    #[test]
    fn test_create_deactivates_others() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);

        reg.create_workspace("A", &pick(&temp.path().join("a"))).unwrap();
        let b = reg.create_workspace("B", &pick(&temp.path().join("b"))).unwrap();

        assert_eq!(reg.list().len(), 2);
        assert_eq!(reg.list().iter().filter(|w| w.active).count(), 1);
        assert_eq!(reg.active().unwrap().root_path, b.root_path);
    }

    #[test]
    fn test_create_cancelled() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);

        let result = reg.create_workspace("A", &ChosenDirectory(None));
        assert!(matches!(result, Err(KronosError::NoDirectorySelected)));
        assert!(!reg.store_path().exists());
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        let mut reg = WorkspaceRegistry::load(
            blocker.join(STORE_FILE),
            Arc::new(ManualClock::new(Utc::now())),
        )
        .unwrap();
        // A plain file where the store directory should be
        fs::write(&blocker, "").unwrap();

        let result = reg.create_workspace("A", &pick(&temp.path().join("a")));
        assert!(result.is_err());
        assert!(reg.active().is_none());
        assert!(reg.list().is_empty());
    }

    #[test]
    fn test_create_same_root_twice_does_not_duplicate() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);
        let root = temp.path().join("a");

        reg.create_workspace("First", &pick(&root)).unwrap();
        reg.create_workspace("Renamed", &pick(&root)).unwrap();

        assert_eq!(reg.list().len(), 1);
        assert_eq!(reg.list()[0].name, "Renamed");
    }

    #[test]
    fn test_open_existing_requires_marker() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);
        let plain = temp.path().join("plain");
        fs::create_dir(&plain).unwrap();

        let result = reg.open_existing(&pick(&plain));
        assert!(matches!(result, Err(KronosError::InvalidWorkspace(_))));
        assert!(reg.list().is_empty());
    }

    #[test]
    fn test_open_existing_registers() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);
        let root = temp.path().join("shared");
        fs::create_dir_all(root.join(".kronos")).unwrap();

        let ws = reg.open_existing(&pick(&root)).unwrap();

        assert_eq!(ws.name, "shared");
        assert!(ws.active);
        assert_eq!(reg.list().len(), 1);
    }

    #[test]
    fn test_set_active_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);
        let a = reg.create_workspace("A", &pick(&temp.path().join("a"))).unwrap();
        reg.create_workspace("B", &pick(&temp.path().join("b"))).unwrap();

        reg.set_active(&a.root_path).unwrap();
        reg.set_active(&a.root_path).unwrap();

        let active: Vec<_> = reg.list().iter().filter(|w| w.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].root_path, a.root_path);
    }

    #[test]
    fn test_set_active_updates_last_opened() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut reg =
            WorkspaceRegistry::load(temp.path().join(STORE_FILE), clock.clone()).unwrap();
        let a = reg.create_workspace("A", &pick(&temp.path().join("a"))).unwrap();

        clock.advance(Duration::minutes(5));
        let reopened = reg.set_active(&a.root_path).unwrap();

        assert_eq!(reopened.last_opened - a.last_opened, Duration::minutes(5));
        assert_eq!(reopened.last_modified, a.last_modified);
    }

    #[test]
    fn test_set_active_unknown_root() {
        let temp = TempDir::new().unwrap();
        let mut reg = registry(&temp);

        let result = reg.set_active(&temp.path().join("nowhere"));
        assert!(matches!(result, Err(KronosError::WorkspaceNotRegistered(_))));
    }

    #[test]
    fn test_registry_persists_across_loads() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join(STORE_FILE);
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Utc::now()));

        let mut reg = WorkspaceRegistry::load(store.clone(), clock.clone()).unwrap();
        reg.create_workspace("A", &pick(&temp.path().join("a"))).unwrap();
        let b = reg.create_workspace("B", &pick(&temp.path().join("b"))).unwrap();

        let reloaded = WorkspaceRegistry::load(store.clone(), clock).unwrap();
        assert_eq!(reloaded.list(), reg.list());
        assert_eq!(reloaded.active(), Some(&b));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store).unwrap()).unwrap();
        assert_eq!(json["kronospheres"].as_array().unwrap().len(), 2);
        assert_eq!(json["currentKronosphere"]["name"], "B");
        assert!(json["currentKronosphere"]["lastOpened"].is_i64());
    }

    #[test]
    fn test_load_legacy_store_without_active_flags() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join(STORE_FILE);
        fs::write(
            &store,
            r#"{
                "kronospheres": [
                    {"name": "A", "path": "/a", "lastModified": 0, "lastOpened": 0, "active": false},
                    {"name": "B", "path": "/b", "lastModified": 0, "lastOpened": 0, "active": false}
                ],
                "currentKronosphere": {"name": "B", "path": "/b", "lastModified": 0, "lastOpened": 0, "active": true}
            }"#,
        )
        .unwrap();

        let reg = WorkspaceRegistry::load(store, Arc::new(ManualClock::new(Utc::now()))).unwrap();
        assert_eq!(reg.active().unwrap().root_path, PathBuf::from("/b"));
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join(STORE_FILE);
        fs::write(&store, "{ not json").unwrap();

        let result = WorkspaceRegistry::load(store, Arc::new(ManualClock::new(Utc::now())));
        assert!(matches!(result, Err(KronosError::Json(_))));
    }
}
