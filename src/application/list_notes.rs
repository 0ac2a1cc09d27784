//! List notes use case

use crate::application::AppContext;
use crate::domain::note::normalize_tag;
use crate::domain::{Note, NoteType};
use crate::error::Result;

/// Filters for `list_notes`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Restrict to one type; all types otherwise
    pub note_type: Option<NoteType>,
    /// Only notes carrying this frontmatter tag
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

/// List notes newest first.
///
/// Dated notes of a single type are ordered by their date id, everything
/// else by `modified`.
pub fn list_notes(ctx: &AppContext, options: &ListOptions) -> Result<Vec<Note>> {
    let store = ctx.notes();
    let types: Vec<NoteType> = match options.note_type {
        Some(note_type) => vec![note_type],
        None => NoteType::ALL.to_vec(),
    };

    let mut notes = Vec::new();
    for note_type in &types {
        notes.extend(store.list(*note_type)?);
    }

    if let Some(tag) = options.tag.as_deref().and_then(normalize_tag) {
        notes.retain(|note| note.metadata.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)));
    }

    match options.note_type {
        Some(note_type) if note_type.is_dated() => notes.sort_by(|a, b| b.id.cmp(&a.id)),
        _ => notes.sort_by(|a, b| {
            b.metadata
                .modified
                .cmp(&a.metadata.modified)
                .then_with(|| a.id.cmp(&b.id))
        }),
    }

    if let Some(limit) = options.limit {
        notes.truncate(limit);
    }

    Ok(notes)
}
