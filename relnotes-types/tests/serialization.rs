//! Serialization behavior of the shared DTOs.

use pretty_assertions::assert_eq;
use relnotes_types::notes::{Area, AreaSection, Category, CategoryGroup, Entry, IssueRef, ReleaseNotes};
use relnotes_types::report::{Finding, RelnotesReport, Severity, VerdictStatus};

fn sample_notes() -> ReleaseNotes {
    ReleaseNotes {
        version: "1.20.7".to_string(),
        sections: vec![AreaSection {
            area: Area::General,
            groups: vec![CategoryGroup {
                category: Category::Features,
                entries: vec![Entry {
                    component: Some("Core & Internals".to_string()),
                    summary: "Prefer root protocol if local site has xCache".to_string(),
                    issue: Some(IssueRef {
                        number: 2769,
                        url: "https://github.com/acme/datagrid/issues/2769".to_string(),
                    }),
                    line: Some(12),
                    raw: None,
                }],
                span: None,
            }],
            span: None,
        }],
        title_span: None,
    }
}

#[test]
fn notes_json_round_trip() {
    let notes = sample_notes();
    let json = serde_json::to_string_pretty(&notes).unwrap();
    let back: ReleaseNotes = serde_json::from_str(&json).unwrap();

    assert_eq!(back.version, "1.20.7");
    assert_eq!(back.entry_count(), 1);
    let (area, category, entry) = back.iter_entries().next().unwrap();
    assert_eq!(area, &Area::General);
    assert_eq!(category, &Category::Features);
    assert_eq!(entry.issue.as_ref().unwrap().number, 2769);
    // Source spans are diagnostic and never serialized.
    assert_eq!(entry.line, None);
}

#[test]
fn areas_serialize_as_plain_strings() {
    let json = serde_json::to_value(Area::Clients).unwrap();
    assert_eq!(json, serde_json::json!("Clients"));

    let unknown: Area = serde_json::from_value(serde_json::json!("Deletion")).unwrap();
    assert_eq!(unknown, Area::Other("Deletion".to_string()));
    assert_eq!(unknown.rank(), None);
}

#[test]
fn categories_serialize_as_plain_strings() {
    let json = serde_json::to_value(Category::Enhancements).unwrap();
    assert_eq!(json, serde_json::json!("Enhancements"));

    let back: Category = serde_json::from_value(serde_json::json!("Bugs")).unwrap();
    assert_eq!(back, Category::Bugs);
    assert_eq!(back.rank(), Some(2));
}

#[test]
fn report_tolerates_missing_optional_fields() {
    let minimal = r#"{
        "schema": "relnotes.report.v1",
        "tool": { "name": "relnotes" }
    }"#;

    let report: RelnotesReport = serde_json::from_str(minimal).unwrap();
    assert_eq!(report.verdict.status, VerdictStatus::Unknown);
    assert!(report.findings.is_empty());
    assert!(report.run.started_at.is_none());
}

#[test]
fn finding_defaults_to_info_severity() {
    let json = r#"{ "check_id": "doc.empty", "message": "no entries" }"#;
    let finding: Finding = serde_json::from_str(json).unwrap();
    assert_eq!(finding.severity, Severity::Info);
    assert!(finding.location.is_none());
}
