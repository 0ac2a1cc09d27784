//! CLI command definitions

use crate::domain::NoteType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kronos")]
#[command(about = "Markdown journal and notes kept in Kronospheres", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Time reference (e.g., today, yesterday, "last monday", 2025-01-17)
    #[arg(value_name = "TIME_REF")]
    pub time_ref: Option<String>,

    /// Create the entry but don't open the editor
    #[arg(long, global = true)]
    pub no_edit: bool,

    /// Registry file (default: $KRONOS_STORE or the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the weekly note for a time reference
    Week {
        #[arg(value_name = "TIME_REF", default_value = "today")]
        time_ref: String,
    },

    /// Manage Kronospheres
    #[command(subcommand)]
    Workspace(WorkspaceCommand),

    /// Create, read and edit notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// List every tag in the active Kronosphere
    Tags {
        /// Only notes of this type
        #[arg(short = 't', long = "type")]
        note_type: Option<NoteType>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// Create a Kronosphere and make it active
    Create {
        name: String,

        /// Directory to use (prompted for when omitted)
        dir: Option<PathBuf>,
    },

    /// Register an existing Kronosphere and make it active
    Open {
        /// Directory to open (prompted for when omitted)
        dir: Option<PathBuf>,
    },

    /// List registered Kronospheres
    List,

    /// Switch to a registered Kronosphere
    Use { dir: PathBuf },

    /// Show the active Kronosphere
    Current,
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// Create a note
    New {
        /// Note body
        content: Option<String>,

        #[arg(short = 't', long = "type", default_value = "document")]
        note_type: NoteType,

        /// Explicit id (dated notes default to the current day or week)
        #[arg(long)]
        id: Option<String>,

        /// Read the body from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
    },

    /// Print a note
    Show {
        id: String,

        #[arg(short = 't', long = "type", default_value = "document")]
        note_type: NoteType,

        /// Print the metadata as well
        #[arg(short, long)]
        meta: bool,
    },

    /// Replace a note's body
    Write {
        id: String,

        /// New body
        content: Option<String>,

        #[arg(short = 't', long = "type", default_value = "document")]
        note_type: NoteType,

        /// Stream the body from stdin with debounced saves
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
    },

    /// Delete a note
    Rm {
        id: String,

        #[arg(short = 't', long = "type", default_value = "document")]
        note_type: NoteType,
    },

    /// List notes, newest first
    Ls {
        #[arg(short = 't', long = "type")]
        note_type: Option<NoteType>,

        /// Only notes with this frontmatter tag
        #[arg(long)]
        tag: Option<String>,

        /// Maximum number of notes to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Add tags to a note, or remove them with --remove
    Tag {
        id: String,

        #[arg(required = true)]
        tags: Vec<String>,

        #[arg(short = 't', long = "type", default_value = "document")]
        note_type: NoteType,

        #[arg(short, long)]
        remove: bool,
    },

    /// Set or remove note properties
    Set {
        id: String,

        /// Properties to set
        #[arg(value_name = "KEY=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        #[arg(short = 't', long = "type", default_value = "document")]
        note_type: NoteType,

        /// Property keys to remove
        #[arg(long, value_name = "KEY")]
        unset: Vec<String>,
    },
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
