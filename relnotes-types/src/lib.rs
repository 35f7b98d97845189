//! Shared DTOs (schemas-as-code) for the relnotes workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod fmt;
pub mod notes;
pub mod report;
pub mod version;

/// Schema identifiers.
pub mod schema {
    pub const RELNOTES_NOTES_V1: &str = "relnotes.notes.v1";
    pub const RELNOTES_REPORT_V1: &str = "relnotes.report.v1";
    pub const RELNOTES_FMT_V1: &str = "relnotes.fmt.v1";
}
