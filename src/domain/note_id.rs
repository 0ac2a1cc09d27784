//! Note id validation and document slugs

use crate::domain::NoteType;
use crate::error::{KronosError, Result};
use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

const MAX_TITLE_CHARS: usize = 50;
const UNTITLED: &str = "Untitled";

fn non_slug_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Check that `id` is a valid identity for a note of `note_type`.
pub fn validate_id(note_type: NoteType, id: &str) -> Result<()> {
    let invalid = || KronosError::InvalidNoteId {
        id: id.to_string(),
        note_type,
    };

    if id.trim().is_empty() {
        return match note_type {
            NoteType::Document => Err(KronosError::MissingId),
            _ => Err(invalid()),
        };
    }

    if id != id.trim() || id.starts_with('.') || id.contains(['/', '\\']) || id.contains('\0') {
        return Err(invalid());
    }

    if note_type.is_dated() && note_type.date_from_id(id).is_none() {
        return Err(invalid());
    }

    Ok(())
}

/// Turn a title into a filename-safe slug.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9]` with a
/// single `-` and trims dashes from both ends. Falls back to `untitled`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = non_slug_regex().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// Extract a title from markdown: the first heading, else the first
/// non-empty line. Limited to 50 characters.
pub fn extract_title(content: &str) -> String {
    let title = first_heading(content)
        .or_else(|| {
            content
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNTITLED.to_string());

    title.chars().take(MAX_TITLE_CHARS).collect::<String>().trim().to_string()
}

fn first_heading(content: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();

    for event in MdParser::new(content) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                let heading = text.trim();
                if !heading.is_empty() {
                    return Some(heading.to_string());
                }
                in_heading = false;
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }

    None
}

/// Id for a new document: the explicit id when given, else the title slug
pub fn document_id(content: &str, explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(id) => {
            validate_id(NoteType::Document, id)?;
            Ok(id.to_string())
        }
        None => Ok(slugify(&extract_title(content))),
    }
}
