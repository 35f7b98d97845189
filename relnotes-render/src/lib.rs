//! Rendering for relnotes documents and reports.
//!
//! `render_rst` is the canonical formatter: parsing an already-canonical
//! file and re-rendering it reproduces the bytes exactly, and rendering is
//! a fixed point through the parser for any document. Parsing rendered
//! output also recovers the same structure, provided the bullet grammar can
//! represent it: a component-less summary containing `": "` renders as a
//! labeled bullet and re-parses with the text before the separator as the
//! component. Everything else in the workspace that needs "what should this
//! file look like" goes through here.

use relnotes_types::notes::{Entry, ReleaseNotes};
use relnotes_types::report::{RelnotesReport, Severity, VerdictStatus};

/// Render a document to canonical reStructuredText.
///
/// Canonical form: underline-only headings with adornment length equal to
/// the title length, one blank line between blocks, a single trailing
/// newline.
pub fn render_rst(doc: &ReleaseNotes) -> String {
    let mut blocks: Vec<String> = Vec::new();
    blocks.push(heading(&doc.version, '='));

    for section in &doc.sections {
        blocks.push(heading(section.area.as_str(), '-'));
        for group in &section.groups {
            blocks.push(heading(group.category.as_str(), '*'));
            if !group.entries.is_empty() {
                let bullets: Vec<String> =
                    group.entries.iter().map(canonical_bullet).collect();
                blocks.push(bullets.join("\n"));
            }
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Canonical form of one bullet line.
///
/// Entries missing a component or an issue reference render best-effort;
/// the linter reports them separately. The grammar has no escaping: a
/// component-less summary containing `": "` is indistinguishable from a
/// labeled bullet once rendered.
pub fn canonical_bullet(entry: &Entry) -> String {
    let mut out = String::from("- ");
    if let Some(component) = &entry.component {
        out.push_str(component);
        out.push_str(": ");
    }
    out.push_str(&entry.summary);
    if let Some(issue) = &entry.issue {
        out.push_str(&format!(" `#{} <{}>`_", issue.number, issue.url));
    }
    out
}

fn heading(title: &str, ch: char) -> String {
    let underline: String = std::iter::repeat_n(ch, title.chars().count()).collect();
    format!("{title}\n{underline}")
}

/// Render a check report as markdown for human review.
pub fn render_report_md(report: &RelnotesReport) -> String {
    let mut out = String::new();
    out.push_str("# relnotes check\n\n");
    out.push_str(&format!("- Status: `{}`\n", status_label(report.verdict.status)));
    out.push_str(&format!(
        "- Files: {} ({} entries)\n",
        report.verdict.counts.files, report.verdict.counts.entries
    ));
    out.push_str(&format!(
        "- Findings: {} errors, {} warnings\n",
        report.verdict.counts.errors, report.verdict.counts.warnings
    ));
    for reason in &report.verdict.reasons {
        out.push_str(&format!("- {reason}\n"));
    }
    out.push('\n');

    out.push_str("## Findings\n\n");
    if report.findings.is_empty() {
        out.push_str("_No findings._\n");
        return out;
    }

    for f in &report.findings {
        let loc = f
            .location
            .as_ref()
            .map(|l| match l.line {
                Some(line) => format!("{}:{}", l.path, line),
                None => l.path.to_string(),
            })
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "- `{}` `{}` at {}: {}\n",
            severity_label(f.severity),
            f.check_id,
            loc,
            f.message
        ));
    }

    out
}

fn status_label(s: VerdictStatus) -> &'static str {
    match s {
        VerdictStatus::Pass => "pass",
        VerdictStatus::Warn => "warn",
        VerdictStatus::Fail => "fail",
        VerdictStatus::Unknown => "unknown",
    }
}

fn severity_label(s: Severity) -> &'static str {
    match s {
        Severity::Info => "info",
        Severity::Warn => "warn",
        Severity::Error => "error",
    }
}
