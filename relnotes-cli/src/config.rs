//! Configuration file loading for relnotes.
//!
//! Discovers and loads `relnotes.toml` from the notes directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "relnotes.toml";

/// Top-level configuration from relnotes.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelnotesConfig {
    /// Lint settings (allow/deny lists, strictness).
    pub lint: LintConfig,

    /// Fmt settings.
    pub fmt: FmtConfig,
}

/// Lint section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Allowlist patterns for check ids.
    /// If non-empty, only allowlisted checks are reported.
    pub allow: Vec<String>,

    /// Denylist patterns for check ids.
    pub deny: Vec<String>,

    /// Treat warnings as failures.
    pub strict: bool,
}

/// Fmt section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FmtConfig {
    pub backups: BackupsConfig,
}

/// Backup settings for `fmt --write`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to keep a copy of the original before rewriting.
    pub enabled: bool,

    /// Suffix for backup files.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: ".orig".to_string(),
        }
    }
}

/// Discover the relnotes.toml config file in the notes directory.
pub fn discover_config(notes_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = notes_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a relnotes.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<RelnotesConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<RelnotesConfig> {
    let config: RelnotesConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the notes directory, or return default if not found.
pub fn load_or_default(notes_dir: &Utf8Path) -> anyhow::Result<RelnotesConfig> {
    match discover_config(notes_dir) {
        Some(path) => load_config(&path),
        None => Ok(RelnotesConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    /// Allow patterns (from config file, extended by CLI).
    pub allow: Vec<String>,

    /// Deny patterns (from config file, extended by CLI).
    pub deny: Vec<String>,

    /// Treat warnings as failures.
    pub strict: bool,

    /// Backup suffix for fmt --write, when backups are enabled.
    pub backup_suffix: Option<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: RelnotesConfig,
}

impl ConfigMerger {
    pub fn new(config: RelnotesConfig) -> Self {
        Self { config }
    }

    /// Merge with check command CLI arguments.
    ///
    /// CLI `allow` and `deny` lists extend the config file lists; `--strict`
    /// overrides the config when set.
    pub fn merge_check_args(
        self,
        cli_allow: &[String],
        cli_deny: &[String],
        cli_strict: bool,
    ) -> MergedConfig {
        let mut allow = self.config.lint.allow.clone();
        let mut deny = self.config.lint.deny.clone();

        // CLI extends the config file lists
        for pattern in cli_allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        for pattern in cli_deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        MergedConfig {
            allow,
            deny,
            strict: cli_strict || self.config.lint.strict,
            backup_suffix: None,
        }
    }

    /// Merge with fmt command CLI arguments.
    ///
    /// `--backup` enables backups regardless of the config; the suffix
    /// always comes from the config (or its default).
    pub fn merge_fmt_args(self, cli_backup: bool) -> MergedConfig {
        let backups = &self.config.fmt.backups;
        let enabled = cli_backup || backups.enabled;

        MergedConfig {
            allow: self.config.lint.allow.clone(),
            deny: self.config.lint.deny.clone(),
            strict: self.config.lint.strict,
            backup_suffix: enabled.then(|| backups.suffix.clone()),
        }
    }
}
