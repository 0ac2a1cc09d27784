//! Note aggregate and its metadata

use crate::domain::NoteType;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Structured metadata carried in a note's frontmatter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteMetadata {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub note_type: NoteType,
    pub tags: Vec<String>,
    /// Freeform properties such as `mood` or `status`
    pub properties: BTreeMap<String, String>,
}

impl NoteMetadata {
    /// Fresh metadata with `created == modified == now`
    pub fn new(note_type: NoteType, now: DateTime<Utc>) -> Self {
        NoteMetadata {
            created: now,
            modified: now,
            note_type,
            tags: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

/// A note as loaded from (or about to be written to) a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub metadata: NoteMetadata,
    pub path: PathBuf,
}

impl Note {
    pub fn note_type(&self) -> NoteType {
        self.metadata.note_type
    }
}

/// Changes applied by the metadata editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    /// Replace the whole tag list
    pub set_tags: Option<Vec<String>>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
    pub set_properties: BTreeMap<String, String>,
    pub remove_properties: Vec<String>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.set_tags.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
            && self.set_properties.is_empty()
            && self.remove_properties.is_empty()
    }

    /// Apply the patch, normalizing tags and property keys.
    /// Returns the keys of properties that were rejected.
    pub fn apply(&self, metadata: &mut NoteMetadata) -> Vec<String> {
        if let Some(tags) = &self.set_tags {
            metadata.tags = tags.clone();
        }
        metadata.tags.extend(self.add_tags.iter().cloned());

        let removed: Vec<String> = self
            .remove_tags
            .iter()
            .filter_map(|t| normalize_tag(t))
            .collect();
        metadata.tags = normalize_tags(&metadata.tags)
            .into_iter()
            .filter(|t| !removed.contains(t))
            .collect();

        let mut rejected = Vec::new();
        for (key, value) in &self.set_properties {
            let key = key.trim();
            if key.is_empty() {
                rejected.push(key.to_string());
                continue;
            }
            metadata.properties.insert(key.to_string(), value.clone());
        }
        for key in &self.remove_properties {
            metadata.properties.remove(key.trim());
        }

        rejected
    }
}

/// Trim a tag and strip a leading `#`. Empty tags yield None.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().trim_start_matches('#').trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Normalize every tag, dropping empties and later duplicates
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().filter_map(|t| normalize_tag(t)) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
