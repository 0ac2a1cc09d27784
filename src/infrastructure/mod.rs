//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod editor;
pub mod fs_util;
pub mod layout;
pub mod note_store;
pub mod registry;

pub use config::Config;
pub use editor::EditorSession;
pub use layout::MARKER_DIR;
pub use note_store::{LoadedNote, NoteStore};
pub use registry::{ChosenDirectory, DirectoryPicker, Workspace, WorkspaceRegistry};
