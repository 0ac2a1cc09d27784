//! Application layer - Use cases and orchestration

pub mod autosave;
pub mod context;
pub mod init;
pub mod list_notes;
pub mod list_tags;
pub mod manage_config;
pub mod open_entry;

pub use autosave::Debouncer;
pub use context::AppContext;
pub use list_notes::{list_notes, ListOptions};
pub use list_tags::ListTagsService;
pub use manage_config::ConfigService;
pub use open_entry::OpenEntryService;
