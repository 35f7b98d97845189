use crate::parse::{ParseError, parse_release};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use relnotes_types::notes::ReleaseNotes;
use relnotes_types::version::VersionKey;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedRelease {
    pub path: Utf8PathBuf,
    /// Version from the file name (best effort; the title may disagree,
    /// which the linter flags).
    pub version: VersionKey,
    /// Raw file contents, absent when the file could not be read.
    pub source: Option<String>,
    pub notes: Result<ReleaseNotes, NoteLoadError>,
}

#[derive(Debug, Error, Clone)]
pub enum NoteLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Scan a release-notes directory for `*.rst` files.
///
/// Unreadable or unparseable files are collected, not fatal: the scan is
/// useful with a corpus "as found". Order is deterministic: version
/// descending (newest first), ties broken by path.
pub fn scan_notes_dir(notes_dir: &Utf8Path) -> anyhow::Result<Vec<LoadedRelease>> {
    let pattern = notes_dir.join("*.rst");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning release-notes directory");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob <notes_dir>/*.rst")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();

        let utf8_path = Utf8PathBuf::from(path);
        let version = VersionKey::parse(utf8_path.file_stem().unwrap_or("unknown"));

        let (source, notes) = match fs::read_to_string(&utf8_path) {
            Ok(s) => {
                let notes = parse_release(&s).map_err(NoteLoadError::from);
                (Some(s), notes)
            }
            Err(e) => (
                None,
                Err(NoteLoadError::Io {
                    message: e.to_string(),
                }),
            ),
        };

        out.push(LoadedRelease {
            path: utf8_path,
            version,
            source,
            notes,
        });
    }

    // Deterministic order matters: newest release first.
    out.sort_by(|a, b| b.version.cmp(&a.version).then_with(|| a.path.cmp(&b.path)));
    Ok(out)
}
