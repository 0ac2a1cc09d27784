//! File-backed note store
//!
//! Notes live under the active workspace:
//!
//! - `journal/daily/<YYYY-MM-DD>.md`
//! - `journal/weekly/<YYYY>-W<ww>.md`
//! - `notes/<slug>.md`
//!
//! The active workspace is looked up on every call, so switching workspaces
//! takes effect immediately.

use crate::domain::frontmatter::{self, ParseFallback};
use crate::domain::note_id::{document_id, validate_id};
use crate::domain::{Clock, MetadataPatch, Note, NoteMetadata, NoteType};
use crate::error::{KronosError, Result};
use crate::infrastructure::fs_util::write_atomic;
use crate::infrastructure::layout::{note_dir, note_path, NOTE_EXTENSION};
use crate::infrastructure::WorkspaceRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A note together with the fallbacks applied while decoding it
#[derive(Debug, Clone)]
pub struct LoadedNote {
    pub note: Note,
    /// False when nothing is stored at the note's location yet
    pub exists: bool,
    pub fallbacks: Vec<ParseFallback>,
}

/// CRUD over the notes of the active workspace
pub struct NoteStore<'a> {
    registry: &'a WorkspaceRegistry,
    clock: &'a dyn Clock,
}

impl<'a> NoteStore<'a> {
    pub fn new(registry: &'a WorkspaceRegistry, clock: &'a dyn Clock) -> Self {
        NoteStore { registry, clock }
    }

    fn active_root(&self) -> Result<&'a Path> {
        self.registry
            .active()
            .map(|ws| ws.root_path.as_path())
            .ok_or(KronosError::NoActiveWorkspace)
    }

    /// Resolve the file for `(id, note_type)` and make sure its directory exists
    pub fn locate(&self, id: &str, note_type: NoteType) -> Result<PathBuf> {
        let root = self.active_root()?;
        let path = note_path(root, note_type, id)?;
        fs::create_dir_all(note_dir(root, note_type))?;
        debug!(id, %note_type, path = %path.display(), "Resolved note");
        Ok(path)
    }

    /// Id used when `create` is called without one for a dated type
    pub fn default_id(&self, note_type: NoteType) -> Option<String> {
        note_type.id_for_date(self.clock.today())
    }

    /// Create a note.
    ///
    /// Daily and weekly notes default to the current period and behave as an
    /// upsert. Documents default to a slug of their title and never overwrite:
    /// a taken slug gets a `-1`, `-2`, ... suffix.
    pub fn create(&self, content: &str, note_type: NoteType, id: Option<&str>) -> Result<Note> {
        let id = match note_type {
            NoteType::Document => self.unique_document_id(&document_id(content, id)?)?,
            _ => match id {
                Some(id) => id.to_string(),
                None => self
                    .default_id(note_type)
                    .ok_or(KronosError::MissingId)?,
            },
        };

        let path = self.locate(&id, note_type)?;
        if path.exists() {
            debug!(id = %id, %note_type, "Note exists, updating instead of creating");
            return self.update(&id, note_type, content);
        }

        let metadata = NoteMetadata::new(note_type, self.clock.now());
        write_atomic(&path, &frontmatter::encode(&metadata, content)?)?;
        info!(id = %id, %note_type, "Created note");

        Ok(Note {
            id,
            content: content.to_string(),
            metadata,
            path,
        })
    }

    fn unique_document_id(&self, base: &str) -> Result<String> {
        let root = self.active_root()?;
        let mut candidate = base.to_string();
        let mut counter = 1;
        while note_path(root, NoteType::Document, &candidate)?.exists() {
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
        Ok(candidate)
    }

    /// Read a note; a missing file reads as an empty note
    pub fn read(&self, id: &str, note_type: NoteType) -> Result<Note> {
        Ok(self.load(id, note_type)?.note)
    }

    /// Read a note and report how it was decoded
    pub fn load(&self, id: &str, note_type: NoteType) -> Result<LoadedNote> {
        let path = self.locate(id, note_type)?;
        self.load_at(id, note_type, path)
    }

    fn load_at(&self, id: &str, note_type: NoteType, path: PathBuf) -> Result<LoadedNote> {
        let now = self.clock.now();

        if !path.is_file() {
            return Ok(LoadedNote {
                note: Note {
                    id: id.to_string(),
                    content: String::new(),
                    metadata: NoteMetadata::new(note_type, now),
                    path,
                },
                exists: false,
                fallbacks: Vec::new(),
            });
        }

        let text = fs::read_to_string(&path)?;
        let mut decoded = frontmatter::decode(&text, now);
        for fallback in &decoded.fallbacks {
            warn!(path = %path.display(), "Frontmatter fallback: {}", fallback);
        }

        // The directory decides the type
        if decoded.metadata.note_type != note_type {
            debug!(
                path = %path.display(),
                stored = %decoded.metadata.note_type,
                "Normalizing note type to its location"
            );
            decoded.metadata.note_type = note_type;
        }

        Ok(LoadedNote {
            note: Note {
                id: id.to_string(),
                content: decoded.body,
                metadata: decoded.metadata,
                path,
            },
            exists: true,
            fallbacks: decoded.fallbacks,
        })
    }

    /// Replace a note's body. Identical content is not written and keeps
    /// `modified` unchanged.
    pub fn update(&self, id: &str, note_type: NoteType, content: &str) -> Result<Note> {
        let path = self.locate(id, note_type)?;
        let current = self.load_at(id, note_type, path)?;

        if current.exists && current.note.content == content {
            debug!(id, %note_type, "Content unchanged, skipping write");
            return Ok(current.note);
        }

        let mut note = current.note;
        note.metadata.modified = self.clock.now();
        note.content = content.to_string();
        write_atomic(&note.path, &frontmatter::encode(&note.metadata, &note.content)?)?;
        info!(id, %note_type, "Updated note");

        Ok(note)
    }

    /// Apply a metadata patch and bump `modified`
    pub fn update_metadata(
        &self,
        id: &str,
        note_type: NoteType,
        patch: &MetadataPatch,
    ) -> Result<Note> {
        let path = self.locate(id, note_type)?;
        let mut note = self.load_at(id, note_type, path)?.note;

        for key in patch.apply(&mut note.metadata) {
            warn!(id, %note_type, key = %key, "Ignoring property with an empty key");
        }
        note.metadata.modified = self.clock.now();
        write_atomic(&note.path, &frontmatter::encode(&note.metadata, &note.content)?)?;
        info!(id, %note_type, "Updated note metadata");

        Ok(note)
    }

    /// Delete a note. Fails with `NotFound` when nothing is stored.
    pub fn delete(&self, id: &str, note_type: NoteType) -> Result<()> {
        let path = self.locate(id, note_type)?;
        if !path.is_file() {
            return Err(KronosError::NotFound {
                id: id.to_string(),
                note_type,
            });
        }

        fs::remove_file(&path)?;
        info!(id, %note_type, "Deleted note");
        Ok(())
    }

    /// Every note of `note_type`, in directory enumeration order.
    /// Entries that cannot be read are logged and skipped.
    pub fn list(&self, note_type: NoteType) -> Result<Vec<Note>> {
        let dir = note_dir(self.active_root()?, note_type);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut notes = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), "Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(NOTE_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Err(e) = validate_id(note_type, id) {
                warn!(path = %path.display(), "Skipping note with unusable id: {}", e);
                continue;
            }

            match self.load_at(id, note_type, path.to_path_buf()) {
                Ok(loaded) => notes.push(loaded.note),
                Err(e) => warn!(path = %path.display(), "Skipping unreadable note: {}", e),
            }
        }

        Ok(notes)
    }
}
