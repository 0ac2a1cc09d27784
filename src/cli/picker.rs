//! Directory prompt for workspace commands run without a directory argument

use crate::infrastructure::DirectoryPicker;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Asks for a directory on stderr and reads the answer from stdin.
/// An empty answer or a closed stdin cancels.
#[derive(Debug, Default)]
pub struct PromptPicker;

impl DirectoryPicker for PromptPicker {
    fn pick_directory(&self, title: &str) -> Option<PathBuf> {
        read_answer(title, io::stdin().lock(), io::stderr())
    }
}

fn read_answer(title: &str, mut input: impl BufRead, mut prompt: impl Write) -> Option<PathBuf> {
    if let Err(e) = write!(prompt, "{}: ", title).and_then(|_| prompt.flush()) {
        debug!(error = %e, "Could not show directory prompt");
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Err(e) => {
            debug!(error = %e, "Could not read directory answer");
            None
        }
        Ok(_) => {
            let answer = line.trim();
            (!answer.is_empty()).then(|| PathBuf::from(answer))
        }
    }
}
