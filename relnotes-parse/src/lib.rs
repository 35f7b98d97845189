//! Release-note ingestion utilities.
//!
//! The parser is deliberately tolerant where tolerance is recoverable: a
//! short underline, an unknown area name, or a bullet without an issue
//! reference still produce a structured document (the linter flags them).
//! Only unrecoverable structure, such as an entry before any category
//! heading, is a parse error.

mod parse;
mod scan;

pub use parse::{ParseError, parse_release};
pub use scan::{LoadedRelease, NoteLoadError, scan_notes_dir};
