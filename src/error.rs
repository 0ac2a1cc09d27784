//! Error types for kronos

use crate::domain::NoteType;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kronos
#[derive(Debug, Error)]
pub enum KronosError {
    #[error("No active Kronosphere")]
    NoActiveWorkspace,

    #[error("No directory selected")]
    NoDirectorySelected,

    #[error("Not a Kronosphere: {0}")]
    InvalidWorkspace(PathBuf),

    #[error("Kronosphere is not registered: {0}")]
    WorkspaceNotRegistered(PathBuf),

    #[error("Document notes require a non-empty id")]
    MissingId,

    #[error("Invalid note id for {note_type} note: '{id}'")]
    InvalidNoteId { id: String, note_type: NoteType },

    #[error("Note not found: {note_type}/{id}")]
    NotFound { id: String, note_type: NoteType },

    #[error("Invalid time reference: {0}")]
    InvalidTimeReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Registry store error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frontmatter serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl KronosError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KronosError::NoActiveWorkspace
            | KronosError::InvalidWorkspace(_)
            | KronosError::WorkspaceNotRegistered(_) => 2,
            KronosError::InvalidTimeReference(_) => 3,
            KronosError::NotFound { .. } => 4,
            KronosError::MissingId | KronosError::InvalidNoteId { .. } => 5,
            KronosError::NoDirectorySelected => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            KronosError::NoActiveWorkspace => "No active Kronosphere\n\n\
                Suggestions:\n\
                • Create one: kronos workspace create <name> <dir>\n\
                • Open an existing one: kronos workspace open <dir>\n\
                • Switch to a registered one: kronos workspace use <dir>"
                .to_string(),
            KronosError::InvalidWorkspace(path) => {
                format!(
                    "Not a Kronosphere: {}\n\n\
                    Suggestions:\n\
                    • A Kronosphere contains a hidden .kronos directory\n\
                    • Run 'kronos workspace create <name> {}' to set it up",
                    path.display(),
                    path.display()
                )
            }
            KronosError::WorkspaceNotRegistered(path) => {
                format!(
                    "Kronosphere is not registered: {}\n\n\
                    Suggestions:\n\
                    • Use 'kronos workspace list' to see registered Kronospheres\n\
                    • Register it with 'kronos workspace open {}'",
                    path.display(),
                    path.display()
                )
            }
            KronosError::InvalidTimeReference(ref_str) => {
                format!(
                    "Invalid time reference: '{}'\n\n\
                    Valid time references:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: DD-MM-YYYY or YYYY-MM-DD\n\n\
                    Examples:\n\
                    kronos today\n\
                    kronos \"last monday\"\n\
                    kronos 2025-01-15",
                    ref_str
                )
            }
            KronosError::NotFound { id, note_type } => {
                format!(
                    "Note not found: {}/{}\n\n\
                    Suggestions:\n\
                    • Use 'kronos note ls --type {}' to see existing notes",
                    note_type, id, note_type
                )
            }
            KronosError::Editor(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that your editor is installed and in PATH\n\
                    • Set EDITOR environment variable (e.g., export EDITOR=nano)\n\
                    • Configure editor: kronos config editor 'vim'",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using KronosError
pub type Result<T> = std::result::Result<T, KronosError>;
