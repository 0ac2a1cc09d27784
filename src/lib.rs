//! kronos - Markdown journal and notes kept in Kronospheres
//!
//! A Kronosphere is a directory holding daily entries, weekly entries and
//! free-form documents as markdown files with YAML frontmatter. A small
//! registry remembers every Kronosphere and which one is active.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::KronosError;
