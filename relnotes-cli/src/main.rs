mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use fs_err as fs;
use relnotes_fmt::{FmtOptions, fmt_files};
use relnotes_lint::registry::{CHECK_REGISTRY, ids, list_check_ids, lookup_check};
use relnotes_lint::{LintContext, filter_findings, lint_release, severity_of};
use relnotes_parse::{LoadedRelease, scan_notes_dir};
use relnotes_render::{canonical_bullet, render_report_md};
use relnotes_types::report::{
    Counts, Finding, Location, RelnotesReport, RunInfo, Severity, ToolInfo, Verdict, VerdictStatus,
};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "relnotes",
    version,
    about = "Checker, formatter, and exporter for versioned .rst release notes."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lint every release file against the format's structural rules.
    Check(CheckArgs),
    /// Rewrite release files to canonical form (default: dry-run with diff).
    Fmt(FmtArgs),
    /// Export parsed release notes as JSON.
    Export(ExportArgs),
    /// Print one release's entries.
    Show(ShowArgs),
    /// List releases, newest first.
    List(ListArgs),
    /// Explain what a check verifies and how to fix violations.
    Explain(ExplainArgs),
    /// List all checks with their severities.
    ListChecks(ListChecksArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Directory containing <version>.rst files (default: current directory).
    #[arg(long, default_value = ".")]
    notes_dir: Utf8PathBuf,

    /// Output directory for report.json and report.md.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Allowlist patterns for check ids.
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist patterns for check ids.
    #[arg(long)]
    deny: Vec<String>,

    /// Treat warnings as failures.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct FmtArgs {
    /// Directory containing <version>.rst files (default: current directory).
    #[arg(long, default_value = ".")]
    notes_dir: Utf8PathBuf,

    /// Rewrite files on disk. If omitted, prints the diff and changes nothing.
    #[arg(long, default_value_t = false)]
    write: bool,

    /// Keep a backup of each rewritten file.
    #[arg(long, default_value_t = false)]
    backup: bool,

    /// Output directory for fmt.json and patch.diff.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Specific files to format (default: every .rst in the notes directory).
    files: Vec<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExportArgs {
    /// Directory containing <version>.rst files (default: current directory).
    #[arg(long, default_value = ".")]
    notes_dir: Utf8PathBuf,

    /// Export a single release instead of all of them.
    #[arg(long)]
    version: Option<String>,

    /// Write to a file instead of stdout.
    #[arg(long)]
    out: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ShowArgs {
    /// Release version to print (e.g. "1.20.7").
    version: String,

    /// Directory containing <version>.rst files (default: current directory).
    #[arg(long, default_value = ".")]
    notes_dir: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct ListArgs {
    /// Directory containing <version>.rst files (default: current directory).
    #[arg(long, default_value = ".")]
    notes_dir: Utf8PathBuf,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Check id to explain (e.g. "entry.duplicate_issue").
    check_id: String,
}

#[derive(Debug, Parser)]
struct ListChecksArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Fmt(args) => cmd_fmt(args),
        Command::Export(args) => cmd_export(args),
        Command::Show(args) => cmd_show(args),
        Command::List(args) => cmd_list(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListChecks(args) => cmd_list_checks(args),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let started_at = Utc::now();

    let file_config = config::load_or_default(&args.notes_dir).context("load relnotes.toml")?;
    let merged =
        ConfigMerger::new(file_config).merge_check_args(&args.allow, &args.deny, args.strict);

    debug!(
        "merged config: allow={:?}, deny={:?}, strict={}",
        merged.allow, merged.deny, merged.strict
    );

    let releases = scan_notes_dir(&args.notes_dir)
        .with_context(|| format!("scan {}", args.notes_dir))?;

    let mut findings = Vec::new();
    let mut entries = 0u64;
    for release in &releases {
        match &release.notes {
            Ok(doc) => {
                entries += doc.entry_count() as u64;
                let ctx = LintContext {
                    path: &release.path,
                    expected_version: Some(release.version.as_str()),
                };
                findings.extend(lint_release(&ctx, doc, release.source.as_deref().unwrap_or("")));
            }
            Err(e) => findings.push(Finding {
                severity: severity_of(ids::DOC_PARSE_ERROR),
                check_id: ids::DOC_PARSE_ERROR.to_string(),
                message: e.to_string(),
                location: Some(Location {
                    path: release.path.clone(),
                    line: None,
                    column: None,
                }),
            }),
        }
    }

    let findings = filter_findings(findings, &merged.allow, &merged.deny);

    let errors = findings.iter().filter(|f| f.severity == Severity::Error).count() as u64;
    let warnings = findings.iter().filter(|f| f.severity == Severity::Warn).count() as u64;

    let status = if errors > 0 {
        VerdictStatus::Fail
    } else if warnings > 0 {
        VerdictStatus::Warn
    } else {
        VerdictStatus::Pass
    };

    let report = RelnotesReport {
        schema: relnotes_types::schema::RELNOTES_REPORT_V1.to_string(),
        tool: tool_info(),
        run: RunInfo {
            started_at: Some(started_at),
            ended_at: Some(Utc::now()),
            notes_dir: Some(args.notes_dir.clone()),
        },
        verdict: Verdict {
            status,
            counts: Counts {
                files: releases.len() as u64,
                entries,
                errors,
                warnings,
            },
            reasons: vec![],
        },
        findings,
        data: Some(serde_json::json!({
            "versions": releases.iter().map(|r| r.version.as_str()).collect::<Vec<_>>(),
        })),
    };

    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
        write_json(&out_dir.join("report.json"), &report)?;
        fs::write(out_dir.join("report.md"), render_report_md(&report))?;
        info!("wrote check report to {}", out_dir);
    }

    match args.format {
        OutputFormat::Text => print_report_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    let failed = errors > 0 || (merged.strict && warnings > 0);
    Ok(if failed { ExitCode::from(2) } else { ExitCode::SUCCESS })
}

fn print_report_text(report: &RelnotesReport) {
    for f in &report.findings {
        let loc = f
            .location
            .as_ref()
            .map(|l| match l.line {
                Some(line) => format!("{}:{}", l.path, line),
                None => l.path.to_string(),
            })
            .unwrap_or_else(|| "-".to_string());
        println!("{loc}: [{}] {}: {}", severity_label(f.severity), f.check_id, f.message);
    }

    let c = &report.verdict.counts;
    println!(
        "{} file(s), {} entries: {} error(s), {} warning(s) [{}]",
        c.files,
        c.entries,
        c.errors,
        c.warnings,
        status_label(report.verdict.status)
    );
}

fn cmd_fmt(args: FmtArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(&args.notes_dir).context("load relnotes.toml")?;
    let merged = ConfigMerger::new(file_config).merge_fmt_args(args.backup);

    let paths: Vec<Utf8PathBuf> = if args.files.is_empty() {
        scan_notes_dir(&args.notes_dir)
            .with_context(|| format!("scan {}", args.notes_dir))?
            .into_iter()
            .map(|r| r.path)
            .collect()
    } else {
        args.files
    };

    let opts = FmtOptions {
        write: args.write,
        backup_suffix: merged.backup_suffix,
    };

    let (outcome, patch) = fmt_files(&paths, tool_info(), &opts).context("format files")?;

    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
        write_json(&out_dir.join("fmt.json"), &outcome)?;
        fs::write(out_dir.join("patch.diff"), &patch)?;
        info!("wrote fmt artifacts to {}", out_dir);
    }

    if !args.write && !patch.is_empty() {
        print!("{patch}");
    }

    let s = &outcome.summary;
    println!(
        "{} checked: {} clean, {} {}, {} failed",
        s.checked,
        s.clean,
        s.changed,
        if args.write { "rewritten" } else { "would rewrite" },
        s.failed
    );

    Ok(if s.failed > 0 { ExitCode::from(2) } else { ExitCode::SUCCESS })
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<ExitCode> {
    let releases = scan_notes_dir(&args.notes_dir)
        .with_context(|| format!("scan {}", args.notes_dir))?;

    let selected: Vec<&LoadedRelease> = match &args.version {
        Some(version) => {
            let release = releases
                .iter()
                .find(|r| r.version.as_str() == version)
                .with_context(|| format!("no release file for version {version}"))?;
            vec![release]
        }
        None => releases.iter().collect(),
    };

    let mut docs = Vec::new();
    for release in selected {
        match &release.notes {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                if args.version.is_some() {
                    anyhow::bail!("{}: {}", release.path, e);
                }
                // Bulk export skips broken files; `check` reports them.
                debug!(path = %release.path, error = %e, "skipping unparseable file");
            }
        }
    }

    let export = serde_json::json!({
        "schema": relnotes_types::schema::RELNOTES_NOTES_V1,
        "tool": tool_info(),
        "generated_at": Utc::now(),
        "releases": docs,
    });

    let rendered = serde_json::to_string_pretty(&export)?;
    match &args.out {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("write {}", path))?;
            info!("wrote export to {}", path);
        }
        None => println!("{rendered}"),
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<ExitCode> {
    let releases = scan_notes_dir(&args.notes_dir)
        .with_context(|| format!("scan {}", args.notes_dir))?;

    let release = releases
        .iter()
        .find(|r| r.version.as_str() == args.version)
        .with_context(|| format!("no release file for version {}", args.version))?;

    let doc = match &release.notes {
        Ok(doc) => doc,
        Err(e) => anyhow::bail!("{}: {}", release.path, e),
    };

    println!("{} ({} entries)", doc.version, doc.entry_count());
    for section in &doc.sections {
        for group in &section.groups {
            println!();
            println!("{} / {}", section.area, group.category);
            for entry in &group.entries {
                println!("  {}", canonical_bullet(entry));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_list(args: ListArgs) -> anyhow::Result<ExitCode> {
    let releases = scan_notes_dir(&args.notes_dir)
        .with_context(|| format!("scan {}", args.notes_dir))?;

    match args.format {
        OutputFormat::Text => {
            println!("  {:<12} {:>7}  FILE", "VERSION", "ENTRIES");
            for release in &releases {
                let entries = release
                    .notes
                    .as_ref()
                    .map(|d| d.entry_count().to_string())
                    .unwrap_or_else(|_| "-".to_string());
                println!("  {:<12} {:>7}  {}", release.version, entries, release.path);
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = releases
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "version": r.version.as_str(),
                        "path": r.path,
                        "entries": r.notes.as_ref().ok().map(|d| d.entry_count()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    let Some(check) = lookup_check(&args.check_id) else {
        let available = list_check_ids().join(", ");
        anyhow::bail!(
            "Unknown check id: '{}'\n\nAvailable checks: {}",
            args.check_id,
            available
        );
    };

    println!("================================================================================");
    println!("CHECK: {}", check.title);
    println!("================================================================================");
    println!();
    println!("Id:       {}", check.id);
    println!("Severity: {}", severity_label(check.severity));
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", check.description);
    println!();

    println!("REMEDIATION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", check.remediation);
    println!();

    Ok(ExitCode::SUCCESS)
}

fn cmd_list_checks(args: ListChecksArgs) -> anyhow::Result<ExitCode> {
    match args.format {
        OutputFormat::Text => {
            println!("Available checks:\n");
            println!("  {:<28} {:<8} TITLE", "ID", "SEVERITY");
            println!("  {:<28} {:<8} -----", "--", "--------");
            for check in CHECK_REGISTRY {
                println!(
                    "  {:<28} {:<8} {}",
                    check.id,
                    severity_label(check.severity),
                    check.title
                );
            }
            println!();
            println!("Use 'relnotes explain <id>' for details.");
        }
        OutputFormat::Json => {
            let checks: Vec<_> = CHECK_REGISTRY
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id,
                        "title": c.title,
                        "severity": severity_label(c.severity),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&checks)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "relnotes".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn severity_label(s: Severity) -> &'static str {
    match s {
        Severity::Info => "info",
        Severity::Warn => "warn",
        Severity::Error => "error",
    }
}

fn status_label(s: VerdictStatus) -> &'static str {
    match s {
        VerdictStatus::Pass => "pass",
        VerdictStatus::Warn => "warn",
        VerdictStatus::Fail => "fail",
        VerdictStatus::Unknown => "unknown",
    }
}
