//! Structural checks for release-note files.
//!
//! Checks run over a parsed document plus its raw source text; every finding
//! carries a stable check id and, where possible, a 1-based source line.
//! Severity comes from the registry so the CLI and the report agree on what
//! is an error versus a warning.

pub mod registry;

use camino::Utf8Path;
use registry::{ids, lookup_check};
use relnotes_render::render_rst;
use relnotes_types::notes::{HeadingSpan, ReleaseNotes};
use relnotes_types::report::{Finding, Location, Severity};
use std::collections::BTreeMap;
use tracing::trace;

/// Context for linting one file.
#[derive(Debug, Clone, Copy)]
pub struct LintContext<'a> {
    /// Path of the file, used for finding locations.
    pub path: &'a Utf8Path,
    /// Version the file name promises (the file stem), if known.
    pub expected_version: Option<&'a str>,
}

/// Run every check against one parsed release file.
pub fn lint_release(ctx: &LintContext<'_>, doc: &ReleaseNotes, source: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_version_mismatch(ctx, doc, &mut findings);
    check_headings(ctx, doc, &mut findings);
    check_section_order(ctx, doc, &mut findings);
    check_entries(ctx, doc, &mut findings);
    check_duplicate_issues(ctx, doc, &mut findings);
    check_format_drift(ctx, doc, source, &mut findings);

    if doc.entry_count() == 0 {
        findings.push(finding(ctx, ids::DOC_EMPTY, None, "release file has no entries"));
    }

    trace!(path = %ctx.path, count = findings.len(), "lint complete");
    findings
}

/// Drop findings whose check id is excluded by allow/deny glob patterns.
///
/// A non-empty allow list is exhaustive: only matching ids survive. Deny
/// patterns are applied afterwards and always win.
pub fn filter_findings(findings: Vec<Finding>, allow: &[String], deny: &[String]) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| check_allowed(&f.check_id, allow, deny))
        .collect()
}

/// Whether a check id passes the allow/deny patterns.
pub fn check_allowed(check_id: &str, allow: &[String], deny: &[String]) -> bool {
    if !allow.is_empty() && !allow.iter().any(|p| glob_match(p, check_id)) {
        return false;
    }
    !deny.iter().any(|p| glob_match(p, check_id))
}

fn check_version_mismatch(ctx: &LintContext<'_>, doc: &ReleaseNotes, out: &mut Vec<Finding>) {
    let Some(expected) = ctx.expected_version else {
        return;
    };
    if doc.version != expected {
        out.push(finding(
            ctx,
            ids::DOC_VERSION_MISMATCH,
            doc.title_span.map(|s| s.line),
            format!("title is \"{}\" but the file name says \"{expected}\"", doc.version),
        ));
    }
}

fn check_headings(ctx: &LintContext<'_>, doc: &ReleaseNotes, out: &mut Vec<Finding>) {
    check_underline(ctx, &doc.version, doc.title_span, out);

    for section in &doc.sections {
        check_underline(ctx, section.area.as_str(), section.span, out);
        if section.area.rank().is_none() {
            out.push(finding(
                ctx,
                ids::HEADING_UNKNOWN_AREA,
                section.span.map(|s| s.line),
                format!("unknown area \"{}\" (expected General or Clients)", section.area),
            ));
        }

        for group in &section.groups {
            check_underline(ctx, group.category.as_str(), group.span, out);
            if group.category.rank().is_none() {
                out.push(finding(
                    ctx,
                    ids::HEADING_UNKNOWN_CATEGORY,
                    group.span.map(|s| s.line),
                    format!(
                        "unknown category \"{}\" (expected Features, Enhancements, or Bugs)",
                        group.category
                    ),
                ));
            }
        }
    }
}

fn check_underline(
    ctx: &LintContext<'_>,
    title: &str,
    span: Option<HeadingSpan>,
    out: &mut Vec<Finding>,
) {
    let Some(span) = span else { return };
    let title_len = title.chars().count() as u64;
    if span.adornment_len != title_len {
        out.push(finding(
            ctx,
            ids::HEADING_UNDERLINE_MISMATCH,
            Some(span.line + 1),
            format!(
                "adornment is {} characters, title \"{title}\" is {title_len}",
                span.adornment_len
            ),
        ));
    }
}

fn check_section_order(ctx: &LintContext<'_>, doc: &ReleaseNotes, out: &mut Vec<Finding>) {
    let mut last_area: Option<u8> = None;
    for section in &doc.sections {
        // Unknown names are reported by check_headings; order only looks at
        // known headings.
        if let Some(rank) = section.area.rank() {
            if last_area.is_some_and(|prev| rank <= prev) {
                out.push(finding(
                    ctx,
                    ids::DOC_SECTION_ORDER,
                    section.span.map(|s| s.line),
                    format!("area \"{}\" out of order (expected General before Clients, each once)", section.area),
                ));
            }
            last_area = Some(rank.max(last_area.unwrap_or(0)));
        }

        let mut last_category: Option<u8> = None;
        for group in &section.groups {
            if let Some(rank) = group.category.rank() {
                if last_category.is_some_and(|prev| rank <= prev) {
                    out.push(finding(
                        ctx,
                        ids::DOC_SECTION_ORDER,
                        group.span.map(|s| s.line),
                        format!(
                            "category \"{}\" out of order in area \"{}\" (expected Features, Enhancements, Bugs, each once)",
                            group.category, section.area
                        ),
                    ));
                }
                last_category = Some(rank.max(last_category.unwrap_or(0)));
            }
        }
    }
}

fn check_entries(ctx: &LintContext<'_>, doc: &ReleaseNotes, out: &mut Vec<Finding>) {
    for (_, _, entry) in doc.iter_entries() {
        if entry.raw.is_none() {
            continue;
        }

        let mut missing = Vec::new();
        if entry.component.is_none() {
            missing.push("component label");
        }
        if entry.issue.is_none() {
            missing.push("issue reference");
        }
        let message = if missing.is_empty() {
            "bullet deviates from `- Component: Summary `#N <URL>`_`".to_string()
        } else {
            format!("bullet is missing: {}", missing.join(", "))
        };

        out.push(finding(ctx, ids::ENTRY_FORMAT, entry.line, message));
    }
}

fn check_duplicate_issues(ctx: &LintContext<'_>, doc: &ReleaseNotes, out: &mut Vec<Finding>) {
    let mut seen: BTreeMap<u64, Option<u64>> = BTreeMap::new();
    for (_, _, entry) in doc.iter_entries() {
        let Some(issue) = &entry.issue else { continue };
        match seen.get(&issue.number) {
            Some(first_line) => {
                let origin = first_line
                    .map(|l| format!(" (first on line {l})"))
                    .unwrap_or_default();
                out.push(finding(
                    ctx,
                    ids::ENTRY_DUPLICATE_ISSUE,
                    entry.line,
                    format!("issue #{} referenced more than once{origin}", issue.number),
                ));
            }
            None => {
                seen.insert(issue.number, entry.line);
            }
        }
    }
}

fn check_format_drift(
    ctx: &LintContext<'_>,
    doc: &ReleaseNotes,
    source: &str,
    out: &mut Vec<Finding>,
) {
    if render_rst(doc) != source {
        out.push(finding(
            ctx,
            ids::DOC_FORMAT_DRIFT,
            None,
            "file is not in canonical form (run `relnotes fmt`)",
        ));
    }
}

fn finding(
    ctx: &LintContext<'_>,
    check_id: &str,
    line: Option<u64>,
    message: impl Into<String>,
) -> Finding {
    Finding {
        severity: severity_of(check_id),
        check_id: check_id.to_string(),
        message: message.into(),
        location: Some(Location {
            path: ctx.path.to_path_buf(),
            line,
            column: None,
        }),
    }
}

/// Default severity of a check, from the registry.
pub fn severity_of(check_id: &str) -> Severity {
    lookup_check(check_id).map(|c| c.severity).unwrap_or(Severity::Warn)
}

/// Simple wildcard matcher: '*' and '?'.
///
/// DP implementation to avoid recursion.
fn glob_match(pat: &str, text: &str) -> bool {
    let p = pat.as_bytes();
    let t = text.as_bytes();
    let mut dp = vec![vec![false; t.len() + 1]; p.len() + 1];
    dp[0][0] = true;

    for i in 1..=p.len() {
        if p[i - 1] == b'*' {
            dp[i][0] = dp[i - 1][0];
        }
    }

    for i in 1..=p.len() {
        for j in 1..=t.len() {
            dp[i][j] = match p[i - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && c == t[j - 1],
            };
        }
    }

    dp[p.len()][t.len()]
}
