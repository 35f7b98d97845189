//! Check registry for the `relnotes explain` and `list-checks` commands.

use relnotes_types::report::Severity;

/// Stable check identifiers.
pub mod ids {
    pub const HEADING_UNDERLINE_MISMATCH: &str = "heading.underline_mismatch";
    pub const HEADING_UNKNOWN_AREA: &str = "heading.unknown_area";
    pub const HEADING_UNKNOWN_CATEGORY: &str = "heading.unknown_category";
    pub const DOC_PARSE_ERROR: &str = "doc.parse_error";
    pub const DOC_VERSION_MISMATCH: &str = "doc.version_mismatch";
    pub const DOC_SECTION_ORDER: &str = "doc.section_order";
    pub const DOC_FORMAT_DRIFT: &str = "doc.format_drift";
    pub const DOC_EMPTY: &str = "doc.empty";
    pub const ENTRY_FORMAT: &str = "entry.format";
    pub const ENTRY_DUPLICATE_ISSUE: &str = "entry.duplicate_issue";
}

/// Information about one check.
#[derive(Debug, Clone)]
pub struct CheckInfo {
    /// Stable check id (e.g. "entry.duplicate_issue").
    pub id: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Default severity of findings from this check.
    pub severity: Severity,
    /// What the check verifies.
    pub description: &'static str,
    /// How to repair a file the check flags.
    pub remediation: &'static str,
}

/// Registry of all checks, in the order they are reported.
pub static CHECK_REGISTRY: &[CheckInfo] = &[
    CheckInfo {
        id: ids::HEADING_UNDERLINE_MISMATCH,
        title: "Heading Underline Length",
        severity: Severity::Warn,
        description: "Every heading adornment must be exactly as long as the title above it. \
A short or long underline still parses, but it is not canonical form.",
        remediation: "Run `relnotes fmt --write` to repair adornment lengths, or edit the \
underline so its character count equals the title's.",
    },
    CheckInfo {
        id: ids::HEADING_UNKNOWN_AREA,
        title: "Known Area Names",
        severity: Severity::Error,
        description: "Area headings (underlined with `-`) must be one of: General, Clients.",
        remediation: "Rename the area heading to General or Clients, or move its entries \
under an existing area.",
    },
    CheckInfo {
        id: ids::HEADING_UNKNOWN_CATEGORY,
        title: "Known Category Names",
        severity: Severity::Error,
        description: "Category headings (underlined with `*`) must be one of: Features, \
Enhancements, Bugs.",
        remediation: "Rename the category heading to Features, Enhancements, or Bugs.",
    },
    CheckInfo {
        id: ids::DOC_PARSE_ERROR,
        title: "Parseable Structure",
        severity: Severity::Error,
        description: "The file must parse as a release document: a version title underlined \
with `=`, area headings underlined with `-`, category headings underlined with `*`, and \
single-line bullets. Files that cannot be read at all are reported here too.",
        remediation: "Fix the structural problem the parser points at (it reports the \
offending line), then re-run the check.",
    },
    CheckInfo {
        id: ids::DOC_VERSION_MISMATCH,
        title: "Title Matches File Name",
        severity: Severity::Error,
        description: "The version title of `<version>.rst` must equal the file stem.",
        remediation: "Rename the file or correct the title so the two agree.",
    },
    CheckInfo {
        id: ids::DOC_SECTION_ORDER,
        title: "Section Order",
        severity: Severity::Error,
        description: "Areas appear in the fixed order General then Clients, each at most \
once; categories within an area appear in the order Features, Enhancements, Bugs, each at \
most once.",
        remediation: "Reorder the sections; merge duplicated headings into one.",
    },
    CheckInfo {
        id: ids::DOC_FORMAT_DRIFT,
        title: "Canonical Formatting",
        severity: Severity::Warn,
        description: "Re-rendering the parsed document must reproduce the file byte for \
byte. Drift usually means stray blank lines, trailing whitespace, or hand-edited spacing.",
        remediation: "Run `relnotes fmt --write` to rewrite the file in canonical form.",
    },
    CheckInfo {
        id: ids::DOC_EMPTY,
        title: "Non-Empty Release",
        severity: Severity::Warn,
        description: "A release file with headings but no entries is probably a stub that \
was never filled in.",
        remediation: "Add the release's entries, or delete the stub file.",
    },
    CheckInfo {
        id: ids::ENTRY_FORMAT,
        title: "Entry Grammar",
        severity: Severity::Error,
        description: "Every bullet must match `- <Component>: <Summary> `#<N> <URL>`_` with \
a strictly numeric issue number.",
        remediation: "Add the missing component label or issue reference, or fix the \
trailer markup. The issue number must be the numeric tracker id.",
    },
    CheckInfo {
        id: ids::ENTRY_DUPLICATE_ISSUE,
        title: "Unique Issue Numbers",
        severity: Severity::Error,
        description: "Each issue number may be referenced at most once per release file.",
        remediation: "Merge the duplicate bullets, or point one of them at the correct \
issue.",
    },
];

/// Look up a check by id. Matching is case-insensitive and treats `-` and
/// `_` as equivalent.
pub fn lookup_check(key: &str) -> Option<&'static CheckInfo> {
    let normalized = normalize_key(key);
    CHECK_REGISTRY.iter().find(|c| normalize_key(c.id) == normalized)
}

/// All check ids, in registry order.
pub fn list_check_ids() -> Vec<&'static str> {
    CHECK_REGISTRY.iter().map(|c| c.id).collect()
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_forgiving_about_case_and_dashes() {
        assert!(lookup_check("entry.duplicate_issue").is_some());
        assert!(lookup_check("ENTRY.DUPLICATE-ISSUE").is_some());
        assert!(lookup_check("no.such_check").is_none());
    }

    #[test]
    fn registry_ids_are_unique() {
        let mut ids = list_check_ids();
        ids.sort();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }
}
