//! `fretdesk-draft` — local persistence of in-progress documents.
//!
//! One key-value slot per wizard type, sqlite-backed, written through a
//! debounced autosaver so rapid edits coalesce into one write. Corrupt or
//! foreign-shaped payloads restore as "no draft", never as an error.

pub mod autosave;
pub mod store;

pub use autosave::DraftAutosave;
pub use store::{DraftKey, DraftStore};
