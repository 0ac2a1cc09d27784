//! Debounced autosave
//!
//! Editors report every change; saving each one would rewrite the note file
//! on every keystroke. The debouncer keeps only the latest content and
//! releases it once no further change arrived for the quiet period.

use crate::application::AppContext;
use crate::domain::{Note, NoteType};
use crate::error::Result;
use std::io::BufRead;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
struct Pending {
    content: String,
    due: Instant,
}

/// Cancel-and-replace save scheduler
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    /// Schedule `content` for saving, replacing anything still pending
    pub fn schedule(&mut self, content: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            content: content.into(),
            due: now + self.quiet,
        });
    }

    /// The pending content, once its quiet period has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.pending.take().map(|p| p.content)
        } else {
            None
        }
    }

    /// Whatever is pending, regardless of the quiet period
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.content)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Stream `reader` line by line into the note's body, saving through a
/// debouncer with the workspace's quiet period. Input is kept byte for byte,
/// line endings and a missing final newline included. The complete text is
/// always saved at end of input.
pub fn write_stream<R: BufRead>(
    ctx: &AppContext,
    id: &str,
    note_type: NoteType,
    mut reader: R,
) -> Result<Note> {
    let quiet = ctx.active_config()?.debounce();
    let store = ctx.notes();
    let mut debouncer = Debouncer::new(quiet);
    let mut buffer = String::new();
    let mut saves = 0usize;

    loop {
        let mut chunk = String::new();
        if reader.read_line(&mut chunk)? == 0 {
            break;
        }
        buffer.push_str(&chunk);

        let now = Instant::now();
        if let Some(content) = debouncer.take_due(now) {
            store.update(id, note_type, &content)?;
            saves += 1;
        }
        debouncer.schedule(buffer.as_str(), now);
    }

    // The last scheduled content is the whole input; empty input schedules nothing
    let content = debouncer.flush().unwrap_or(buffer);
    let note = store.update(id, note_type, &content)?;
    debug!(id, %note_type, intermediate_saves = saves, "Finished streaming note");
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init::create_workspace;
    use crate::domain::ManualClock;
    use crate::infrastructure::ChosenDirectory;
    use chrono::Utc;
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn test_nothing_due_before_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.schedule("a", start);
        assert_eq!(debouncer.take_due(start + Duration::from_millis(299)), None);
        assert!(debouncer.is_pending());
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(300)),
            Some("a".to_string())
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_due(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_reschedule_replaces_and_restarts() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.schedule("a", start);
        debouncer.schedule("ab", start + Duration::from_millis(200));
        debouncer.schedule("abc", start + Duration::from_millis(400));

        assert_eq!(debouncer.take_due(start + Duration::from_millis(500)), None);
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(700)),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_flush() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        assert_eq!(debouncer.flush(), None);

        debouncer.schedule("draft", start);
        assert_eq!(debouncer.flush(), Some("draft".to_string()));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn test_write_stream_saves_everything() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut ctx = AppContext::with_clock(temp.path().join("store.json"), clock).unwrap();
        create_workspace(&mut ctx, "t", &ChosenDirectory(Some(temp.path().join("ws")))).unwrap();

        let input = Cursor::new("first line\nsecond line\n");
        let note = write_stream(&ctx, "stream", NoteType::Document, input).unwrap();

        assert_eq!(note.content, "first line\nsecond line\n");
        let read = ctx.notes().read("stream", NoteType::Document).unwrap();
        assert_eq!(read.content, "first line\nsecond line\n");
    }

    #[test]
    fn test_write_stream_keeps_line_endings() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut ctx = AppContext::with_clock(temp.path().join("store.json"), clock).unwrap();
        create_workspace(&mut ctx, "t", &ChosenDirectory(Some(temp.path().join("ws")))).unwrap();

        let input = Cursor::new("line one\r\nno trailing newline");
        let note = write_stream(&ctx, "crlf", NoteType::Document, input).unwrap();

        assert_eq!(note.content, "line one\r\nno trailing newline");
        let read = ctx.notes().read("crlf", NoteType::Document).unwrap();
        assert_eq!(read.content, "line one\r\nno trailing newline");
    }
}
