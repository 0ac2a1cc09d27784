//! Output formatting utilities

use crate::domain::frontmatter::format_date;
use crate::domain::Note;
use crate::infrastructure::{Config, Workspace};

/// Format a list of notes for display
pub fn format_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes found".to_string();
    }

    let mut output = String::new();
    for note in notes {
        output.push_str(&format!(
            "{:<8}  {}  {}",
            note.note_type().as_str(),
            note.metadata.modified.format("%Y-%m-%d %H:%M"),
            note.id
        ));
        if !note.metadata.tags.is_empty() {
            output.push_str("  ");
            output.push_str(&hashtags(&note.metadata.tags));
        }
        output.push('\n');
    }
    output
}

/// Format a list of tags for display.
pub fn format_tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags found".to_string();
    }

    let mut output = String::new();
    for tag in tags {
        output.push_str(&format!("#{}\n", tag));
    }

    output
}

/// Format registered workspaces, marking the active one with `*`
pub fn format_workspace_list(workspaces: &[Workspace]) -> String {
    if workspaces.is_empty() {
        return "No Kronospheres registered".to_string();
    }

    let mut output = String::new();
    for ws in workspaces {
        output.push_str(&format!(
            "{} {}  {}\n",
            if ws.active { "*" } else { " " },
            ws.name,
            ws.root_path.display()
        ));
    }
    output
}

/// Note body, optionally preceded by its metadata
pub fn format_note(note: &Note, with_meta: bool) -> String {
    if !with_meta {
        return note.content.clone();
    }

    let meta = &note.metadata;
    let mut output = format!(
        "id: {}\ntype: {}\ncreated: {}\nmodified: {}\n",
        note.id,
        meta.note_type,
        format_date(&meta.created),
        format_date(&meta.modified)
    );
    if !meta.tags.is_empty() {
        output.push_str(&format!("tags: {}\n", hashtags(&meta.tags)));
    }
    for (key, value) in &meta.properties {
        output.push_str(&format!("{}: {}\n", key, value));
    }
    output.push('\n');
    output.push_str(&note.content);
    output
}

pub fn format_config(config: &Config) -> String {
    format!(
        "editor = {}\ndebounce_ms = {}\ncreated = {}\n",
        config.editor,
        config.debounce_ms,
        config.created.to_rfc3339()
    )
}

fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}
