//! CLI layer - Command-line interface

pub mod commands;
pub mod output;
pub mod picker;

pub use commands::{Cli, Commands, NoteCommand, WorkspaceCommand};
pub use output::{format_config, format_note, format_note_list, format_tag_list, format_workspace_list};
pub use picker::PromptPicker;
