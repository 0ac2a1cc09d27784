//! External editor integration

use crate::error::{KronosError, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Session for opening a note file in an external editor
pub struct EditorSession {
    command: String,
    wait: bool,
}

impl EditorSession {
    /// Create a new editor session with the given command line
    pub fn new(editor_command: impl Into<String>) -> Self {
        EditorSession {
            command: editor_command.into(),
            wait: false,
        }
    }

    /// Block until the editor exits instead of returning right away
    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Open a file in the editor
    pub fn open(&self, file_path: &Path) -> Result<()> {
        let mut parts = split_command(&self.command);
        if parts.is_empty() {
            parts.push(if cfg!(windows) { "notepad" } else { "vi" }.to_string());
        }
        let program = parts.remove(0);
        parts.push(file_path.to_string_lossy().into_owned());

        // On Windows, go through cmd so .bat and .cmd editors are found
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&program);
            cmd
        } else {
            Command::new(&program)
        };
        cmd.args(&parts);

        debug!(editor = %program, file = %file_path.display(), wait = self.wait, "Launching editor");
        let launch_error =
            |e: std::io::Error| KronosError::Editor(format!("Failed to launch editor '{}': {}", program, e));

        if self.wait {
            let status = cmd.status().map_err(launch_error)?;
            if !status.success() {
                return Err(KronosError::Editor(format!(
                    "Editor '{}' exited with {}",
                    program, status
                )));
            }
        } else {
            cmd.spawn().map_err(launch_error)?;
        }

        Ok(())
    }
}

/// Split an editor command line on whitespace, honouring single and double
/// quotes so paths with spaces survive.
fn split_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for ch in command.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    parts.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        parts.push(current);
    }

    parts
}
