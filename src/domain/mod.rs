//! Domain layer - Note model, identity rules and the frontmatter codec

pub mod clock;
pub mod frontmatter;
pub mod note;
pub mod note_id;
pub mod note_type;
pub mod template;
pub mod time_ref;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frontmatter::{Decoded, ParseFallback};
pub use note::{MetadataPatch, Note, NoteMetadata};
pub use note_type::NoteType;
pub use template::load_template;
pub use time_ref::TimeReference;
