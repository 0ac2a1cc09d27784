//! List tags use case

use crate::application::AppContext;
use crate::domain::NoteType;
use crate::error::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?:^|[^\w&/#])#([a-zA-Z0-9_-]+)").unwrap())
}

fn collect_tags_from_text(text: &str, output: &mut BTreeSet<String>) {
    for captures in tag_regex().captures_iter(text) {
        output.insert(captures[1].to_lowercase());
    }
}

/// Service for listing every tag in the active workspace: frontmatter tags
/// plus inline `#tags` in note bodies.
pub struct ListTagsService<'a> {
    ctx: &'a AppContext,
}

impl<'a> ListTagsService<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Sorted, lowercased, deduplicated tags
    pub fn execute(&self, note_type: Option<NoteType>) -> Result<Vec<String>> {
        let store = self.ctx.notes();
        let types: Vec<NoteType> = match note_type {
            Some(note_type) => vec![note_type],
            None => NoteType::ALL.to_vec(),
        };

        let mut tags = BTreeSet::new();
        for note_type in types {
            for note in store.list(note_type)? {
                tags.extend(note.metadata.tags.iter().map(|t| t.to_lowercase()));
                collect_tags_from_text(&note.content, &mut tags);
            }
        }

        Ok(tags.into_iter().collect())
    }
}
