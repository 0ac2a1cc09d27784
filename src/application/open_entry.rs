//! Journal entry use case: resolve a time reference to a daily or weekly
//! note, create it from its template when absent, and hand it to the editor.

use crate::application::AppContext;
use crate::domain::{load_template, MetadataPatch, Note, NoteType, TimeReference};
use crate::error::{KronosError, Result};
use crate::infrastructure::EditorSession;
use tracing::{debug, info};

/// Service for opening journal entries
pub struct OpenEntryService<'a> {
    ctx: &'a AppContext,
}

impl<'a> OpenEntryService<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        OpenEntryService { ctx }
    }

    /// Daily note for `time_ref`
    pub fn open_entry(&self, time_ref: &str, open_in_editor: bool) -> Result<Note> {
        self.execute(NoteType::Daily, time_ref, open_in_editor)
    }

    /// Weekly note for the week containing `time_ref`
    pub fn open_week(&self, time_ref: &str, open_in_editor: bool) -> Result<Note> {
        self.execute(NoteType::Weekly, time_ref, open_in_editor)
    }

    fn execute(&self, note_type: NoteType, time_ref: &str, open_in_editor: bool) -> Result<Note> {
        let date = TimeReference::parse(time_ref)?.resolve(self.ctx.clock().today())?;
        let id = note_type.id_for_date(date).ok_or(KronosError::MissingId)?;
        debug!(time_ref, %date, id = %id, "Resolved time reference");

        let store = self.ctx.notes();
        let loaded = store.load(&id, note_type)?;
        let note = if loaded.exists {
            loaded.note
        } else {
            let root = self.ctx.active_root()?;
            let content = load_template(root, note_type)?.render(date);
            info!(id = %id, %note_type, "Starting new journal entry");
            store.create(&content, note_type, Some(&id))?
        };

        if !open_in_editor {
            return Ok(note);
        }

        let config = self.ctx.active_config()?;
        EditorSession::new(config.get_editor())
            .wait(true)
            .open(&note.path)?;

        // The editor rewrote the file; stamp it if the body changed
        let edited = store.read(&id, note_type)?;
        if edited.content != note.content {
            return store.update_metadata(&id, note_type, &MetadataPatch::default());
        }
        Ok(edited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init::create_workspace;
    use crate::domain::ManualClock;
    use crate::infrastructure::ChosenDirectory;
    use chrono::{Datelike, Duration, Utc};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> AppContext {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut ctx = AppContext::with_clock(temp.path().join("store.json"), clock).unwrap();
        create_workspace(
            &mut ctx,
            "test",
            &ChosenDirectory(Some(temp.path().join("ws"))),
        )
        .unwrap();
        ctx
    }

    #[test]
    fn test_creates_daily_entry_from_template() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let today = ctx.clock().today();

        let note = OpenEntryService::new(&ctx).open_entry("today", false).unwrap();

        assert_eq!(note.id, today.format("%Y-%m-%d").to_string());
        assert!(note.content.starts_with("## Journal Entry - "));
        assert!(note.content.contains(&today.year().to_string()));
        assert!(note.path.is_file());
    }

    #[test]
    fn test_existing_entry_untouched() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let service = OpenEntryService::new(&ctx);

        let first = service.open_entry("yesterday", false).unwrap();
        ctx.notes()
            .update(&first.id, NoteType::Daily, "my own words")
            .unwrap();

        let again = service.open_entry("yesterday", false).unwrap();
        assert_eq!(again.content, "my own words");
        assert_eq!(again.id, (ctx.clock().today() - Duration::days(1)).format("%Y-%m-%d").to_string());
    }

    #[test]
    fn test_week_entry() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        let note = OpenEntryService::new(&ctx).open_week("2025-01-17", false).unwrap();

        assert_eq!(note.id, "2025-W03");
        assert!(note.content.starts_with("## Week 03, 2025"));
        assert!(ctx
            .active_root()
            .unwrap()
            .join("journal/weekly/2025-W03.md")
            .is_file());
    }

    #[test]
    fn test_custom_template() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let templates = ctx.active_root().unwrap().join(".kronos/templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("daily.md"), "# {DAY_NAME} {ISO_DATE}\n").unwrap();

        let note = OpenEntryService::new(&ctx).open_entry("2025-01-17", false).unwrap();
        assert_eq!(note.content, "# Friday 2025-01-17\n");
    }

    #[test]
    fn test_invalid_time_reference() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        let result = OpenEntryService::new(&ctx).open_entry("someday", false);
        assert!(matches!(result, Err(KronosError::InvalidTimeReference(_))));
    }

    #[test]
    fn test_time_reference_beyond_calendar() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        let result = OpenEntryService::new(&ctx).open_entry("+99999999", false);
        assert!(matches!(result, Err(KronosError::InvalidTimeReference(_))));
        let result = OpenEntryService::new(&ctx).open_week("99999999999 days ago", false);
        assert!(matches!(result, Err(KronosError::InvalidTimeReference(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_changes_are_kept() {
        if std::env::var_os("EDITOR").is_some() || std::env::var_os("VISUAL").is_some() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let root = ctx.active_root().unwrap().to_path_buf();
        let mut config = ctx.active_config().unwrap();
        config.editor = "sh -c 'echo edited >> \"$0\"'".to_string();
        config.save_to_dir(&root).unwrap();

        let note = OpenEntryService::new(&ctx).open_entry("2025-01-17", true).unwrap();

        assert!(note.content.trim_end().ends_with("edited"));
    }
}
