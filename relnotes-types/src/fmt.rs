use crate::report::ToolInfo;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Outcome artifact of `relnotes fmt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmtOutcome {
    /// Schema identifier, e.g. "relnotes.fmt.v1".
    pub schema: String,

    pub tool: ToolInfo,

    /// True when files were rewritten on disk rather than previewed.
    pub wrote: bool,

    #[serde(default)]
    pub results: Vec<FileFmtResult>,

    pub summary: FmtSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFmtResult {
    pub path: Utf8PathBuf,

    pub status: FmtStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FmtStatus {
    /// Already canonical, nothing to do.
    Clean,
    /// Rewritten on disk.
    Rewritten,
    /// Dry-run: file differs from canonical form.
    WouldRewrite,
    /// File could not be parsed; left untouched.
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FmtSummary {
    pub checked: u64,
    pub clean: u64,
    /// Files that differ from canonical form (rewritten, or would be).
    pub changed: u64,
    pub failed: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_bytes: Option<u64>,
}
