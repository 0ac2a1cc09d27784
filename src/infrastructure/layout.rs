//! On-disk layout of a Kronosphere

use crate::domain::note_id::validate_id;
use crate::domain::NoteType;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Hidden directory marking a directory as a Kronosphere
pub const MARKER_DIR: &str = ".kronos";

/// Extension of note files
pub const NOTE_EXTENSION: &str = "md";

/// Check if a path contains the marker directory
pub fn is_workspace(root: &Path) -> bool {
    root.join(MARKER_DIR).is_dir()
}

/// Directory holding every note of `note_type`
pub fn note_dir(root: &Path, note_type: NoteType) -> PathBuf {
    note_type
        .directory()
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Canonical location of a note. Pure: depends only on its arguments.
pub fn note_path(root: &Path, note_type: NoteType, id: &str) -> Result<PathBuf> {
    validate_id(note_type, id)?;
    Ok(note_dir(root, note_type).join(format!("{}.{}", id, NOTE_EXTENSION)))
}
