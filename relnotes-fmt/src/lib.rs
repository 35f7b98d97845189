//! Rewrite engine for `relnotes fmt`.
//!
//! Responsibilities:
//! - Compute the canonical form of each release file.
//! - Generate a unified diff preview.
//! - Rewrite files on disk (optionally keeping a backup), recording sha256
//!   before/after for each change.
//!
//! Files that fail to read or parse are reported as failed results; they
//! never abort the run and are never touched on disk.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use relnotes_parse::parse_release;
use relnotes_render::render_rst;
use relnotes_types::fmt::{FileFmtResult, FmtOutcome, FmtStatus, FmtSummary};
use relnotes_types::report::ToolInfo;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct FmtOptions {
    /// Rewrite files on disk. When false, only results and a patch are
    /// produced.
    pub write: bool,
    /// Keep a copy of the original at `<path><suffix>` before rewriting.
    pub backup_suffix: Option<String>,
}

/// Format a set of release files.
///
/// Returns the outcome artifact plus an aggregate unified diff of every
/// non-canonical file. Input order is normalized to sorted paths so the
/// patch and results are deterministic.
pub fn fmt_files(
    paths: &[Utf8PathBuf],
    tool: ToolInfo,
    opts: &FmtOptions,
) -> anyhow::Result<(FmtOutcome, String)> {
    let mut paths: Vec<&Utf8PathBuf> = paths.iter().collect();
    paths.sort();
    paths.dedup();

    let mut results = Vec::new();
    let mut summary = FmtSummary::default();
    let mut patch = String::new();

    for path in paths {
        summary.checked += 1;
        results.push(fmt_one(path, opts, &mut summary, &mut patch)?);
    }

    summary.patch_bytes = Some(patch.len() as u64);

    let outcome = FmtOutcome {
        schema: relnotes_types::schema::RELNOTES_FMT_V1.to_string(),
        tool,
        wrote: opts.write,
        results,
        summary,
    };

    Ok((outcome, patch))
}

fn fmt_one(
    path: &Utf8Path,
    opts: &FmtOptions,
    summary: &mut FmtSummary,
    patch: &mut String,
) -> anyhow::Result<FileFmtResult> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            summary.failed += 1;
            return Ok(FileFmtResult {
                path: path.to_path_buf(),
                status: FmtStatus::Failed,
                message: Some(format!("read failed: {e}")),
                sha256_before: None,
                sha256_after: None,
            });
        }
    };

    let sha_before = sha256_hex(source.as_bytes());

    let doc = match parse_release(&source) {
        Ok(doc) => doc,
        Err(e) => {
            summary.failed += 1;
            return Ok(FileFmtResult {
                path: path.to_path_buf(),
                status: FmtStatus::Failed,
                message: Some(format!("parse failed: {e}")),
                sha256_before: Some(sha_before),
                sha256_after: None,
            });
        }
    };

    let canonical = render_rst(&doc);
    if canonical == source {
        debug!(path = %path, "already canonical");
        summary.clean += 1;
        return Ok(FileFmtResult {
            path: path.to_path_buf(),
            status: FmtStatus::Clean,
            message: None,
            sha256_before: Some(sha_before.clone()),
            sha256_after: Some(sha_before),
        });
    }

    summary.changed += 1;
    append_patch(patch, path, &source, &canonical);

    let status = if opts.write {
        if let Some(suffix) = &opts.backup_suffix {
            let backup = Utf8PathBuf::from(format!("{path}{suffix}"));
            fs::write(&backup, &source).with_context(|| format!("write backup {backup}"))?;
        }
        fs::write(path, &canonical).with_context(|| format!("write {path}"))?;
        info!(path = %path, "rewrote to canonical form");
        FmtStatus::Rewritten
    } else {
        FmtStatus::WouldRewrite
    };

    Ok(FileFmtResult {
        path: path.to_path_buf(),
        status,
        message: None,
        sha256_before: Some(sha_before),
        sha256_after: Some(sha256_hex(canonical.as_bytes())),
    })
}

fn append_patch(out: &mut String, path: &Utf8Path, old: &str, new: &str) {
    let formatter = PatchFormatter::new();

    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(old, new);
    out.push_str(&formatter.fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
