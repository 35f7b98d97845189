//! Unit tests for the directory scanner.

use camino::Utf8PathBuf;
use relnotes_parse::{NoteLoadError, scan_notes_dir};
use std::fs;
use tempfile::TempDir;

fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn notes_path(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().join("releasenotes")).unwrap()
}

fn create_release(dir: &Utf8PathBuf, version: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(format!("{version}.rst")), contents).unwrap();
}

fn valid_release(version: &str) -> String {
    format!(
        "{version}\n\
         {underline}\n\
         \n\
         General\n\
         -------\n\
         \n\
         Bugs\n\
         ****\n\
         \n\
         - Deletion: Fix reaper `#10 <https://tracker/10>`_\n",
        underline = "=".repeat(version.len()),
    )
}

#[test]
fn test_empty_notes_dir() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);
    fs::create_dir_all(&dir).unwrap();

    let releases = scan_notes_dir(&dir).unwrap();
    assert!(releases.is_empty());
}

#[test]
fn test_missing_notes_dir() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);
    // Don't create the directory

    let releases = scan_notes_dir(&dir).unwrap();
    assert!(releases.is_empty());
}

#[test]
fn test_single_valid_release() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);
    create_release(&dir, "1.20.7", &valid_release("1.20.7"));

    let releases = scan_notes_dir(&dir).unwrap();
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].version.as_str(), "1.20.7");
    assert!(releases[0].notes.is_ok());
    assert!(releases[0].source.is_some());
}

#[test]
fn test_releases_sorted_newest_first() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);

    // Create in a non-version order; lexical order would also be wrong here
    // (1.9.0 sorts after 1.10.0 lexically).
    create_release(&dir, "1.9.0", &valid_release("1.9.0"));
    create_release(&dir, "1.20.7", &valid_release("1.20.7"));
    create_release(&dir, "1.10.0", &valid_release("1.10.0"));

    let releases = scan_notes_dir(&dir).unwrap();
    let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(versions, vec!["1.20.7", "1.10.0", "1.9.0"]);
}

#[test]
fn test_corrupted_file_collected_without_failing() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);

    create_release(&dir, "1.20.7", &valid_release("1.20.7"));
    create_release(&dir, "1.20.8", "no headings, just prose\n");

    let releases = scan_notes_dir(&dir).unwrap();
    assert_eq!(releases.len(), 2);

    let good = releases.iter().find(|r| r.version.as_str() == "1.20.7").unwrap();
    let bad = releases.iter().find(|r| r.version.as_str() == "1.20.8").unwrap();

    assert!(good.notes.is_ok());
    assert!(matches!(bad.notes, Err(NoteLoadError::Parse(_))));
    // The source is still available for reporting.
    assert!(bad.source.is_some());
}

#[test]
fn test_rst_file_as_directory_yields_io_error() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);
    fs::create_dir_all(dir.join("1.20.7.rst")).unwrap();

    let releases = scan_notes_dir(&dir).unwrap();
    assert_eq!(releases.len(), 1);
    assert!(matches!(releases[0].notes, Err(NoteLoadError::Io { .. })));
    assert!(releases[0].source.is_none());
}

#[test]
fn test_non_rst_files_ignored() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);
    create_release(&dir, "1.20.7", &valid_release("1.20.7"));
    fs::write(dir.join("README.md"), "not a release file").unwrap();
    fs::write(dir.join("relnotes.toml"), "").unwrap();

    let releases = scan_notes_dir(&dir).unwrap();
    assert_eq!(releases.len(), 1);
}

#[test]
fn test_version_taken_from_file_name() {
    let temp = create_temp_dir();
    let dir = notes_path(&temp);
    // Title disagrees with the file name; the scanner trusts the name and
    // the linter reports the mismatch.
    create_release(&dir, "1.20.9", &valid_release("1.20.7"));

    let releases = scan_notes_dir(&dir).unwrap();
    assert_eq!(releases[0].version.as_str(), "1.20.9");
    assert_eq!(releases[0].notes.as_ref().unwrap().version, "1.20.7");
}
