//! Parser behavior against whole documents.

use pretty_assertions::assert_eq;
use relnotes_parse::{ParseError, parse_release};
use relnotes_types::notes::{Area, Category};

/// The 1.20.7 release file: 1 feature, 2 + 2 enhancements, 5 bugs.
const RELEASE_1_20_7: &str = "\
1.20.7
======

General
-------

Features
********

- Core & Internals: Prefer root protocol if local site has xCache `#2769 <https://github.com/acme/datagrid/issues/2769>`_

Enhancements
************

- Deletion: Reaper sorts replicas by tombstone before deletion `#2792 <https://github.com/acme/datagrid/issues/2792>`_
- Rebalancing: Skip sites already at their target occupancy `#2798 <https://github.com/acme/datagrid/issues/2798>`_

Bugs
****

- Deletion: Reaper crashes when a storage element has no protocol `#2801 <https://github.com/acme/datagrid/issues/2801>`_
- Transfers: FTS3 submission retries duplicate the transfer request `#2805 <https://github.com/acme/datagrid/issues/2805>`_
- Permissions: Account permission check ignores admin override `#2811 <https://github.com/acme/datagrid/issues/2811>`_
- Core & Internals: PFN lookup fails for protocols with no port `#2814 <https://github.com/acme/datagrid/issues/2814>`_
- Rebalancing: Expression evaluation fails on empty site list `#2816 <https://github.com/acme/datagrid/issues/2816>`_

Clients
-------

Enhancements
************

- CLI: Show transfer priority in the listing output `#2820 <https://github.com/acme/datagrid/issues/2820>`_
- Python clients: Expose replica sorting by client location `#2824 <https://github.com/acme/datagrid/issues/2824>`_
";

#[test]
fn parses_the_1_20_7_release() {
    let doc = parse_release(RELEASE_1_20_7).unwrap();

    assert_eq!(doc.version, "1.20.7");
    assert_eq!(doc.entry_count(), 10);
    assert_eq!(doc.sections.len(), 2);

    let general = &doc.sections[0];
    assert_eq!(general.area, Area::General);
    assert_eq!(general.groups.len(), 3);
    assert_eq!(general.groups[0].category, Category::Features);
    assert_eq!(general.groups[0].entries.len(), 1);
    assert_eq!(general.groups[1].category, Category::Enhancements);
    assert_eq!(general.groups[1].entries.len(), 2);
    assert_eq!(general.groups[2].category, Category::Bugs);
    assert_eq!(general.groups[2].entries.len(), 5);

    let clients = &doc.sections[1];
    assert_eq!(clients.area, Area::Clients);
    assert_eq!(clients.groups.len(), 1);
    assert_eq!(clients.groups[0].category, Category::Enhancements);
    assert_eq!(clients.groups[0].entries.len(), 2);

    let feature = &general.groups[0].entries[0];
    assert_eq!(feature.component.as_deref(), Some("Core & Internals"));
    assert_eq!(
        feature.summary,
        "Prefer root protocol if local site has xCache"
    );
    assert_eq!(feature.issue.as_ref().unwrap().number, 2769);
    assert_eq!(feature.raw, None);
}

#[test]
fn records_source_lines() {
    let doc = parse_release(RELEASE_1_20_7).unwrap();
    assert_eq!(doc.title_span.unwrap().line, 1);
    assert_eq!(doc.title_span.unwrap().adornment_len, 6);

    let (_, _, first) = doc.iter_entries().next().unwrap();
    assert_eq!(first.line, Some(10));
}

#[test]
fn tolerates_short_underline() {
    let doc = parse_release(
        "1.2.0\n\
         ===\n\
         \n\
         General\n\
         -------\n\
         \n\
         Bugs\n\
         ****\n\
         \n\
         - Deletion: Fix reaper `#10 <https://tracker/10>`_\n",
    )
    .unwrap();
    assert_eq!(doc.title_span.unwrap().adornment_len, 3);
    assert_eq!(doc.entry_count(), 1);
}

#[test]
fn tolerates_unknown_area_and_category() {
    let doc = parse_release(
        "1.2.0\n\
         =====\n\
         \n\
         Probes\n\
         ------\n\
         \n\
         Hotfixes\n\
         ********\n\
         \n\
         - X: Y `#1 <https://tracker/1>`_\n",
    )
    .unwrap();
    assert_eq!(doc.sections[0].area, Area::Other("Probes".to_string()));
    assert_eq!(
        doc.sections[0].groups[0].category,
        Category::Other("Hotfixes".to_string())
    );
}

#[test]
fn empty_file_is_an_error() {
    assert_eq!(parse_release(""), Err(ParseError::Empty));
    assert_eq!(parse_release("  \n\n"), Err(ParseError::Empty));
}

#[test]
fn entry_before_any_category_is_an_error() {
    let err = parse_release(
        "1.2.0\n\
         =====\n\
         \n\
         - Deletion: too early\n",
    )
    .unwrap_err();
    assert_eq!(err, ParseError::EntryOutsideCategory { line: 4 });
}

#[test]
fn category_outside_area_is_an_error() {
    let err = parse_release(
        "1.2.0\n\
         =====\n\
         \n\
         Features\n\
         ********\n",
    )
    .unwrap_err();
    assert_eq!(err, ParseError::CategoryOutsideArea { line: 4 });
}

#[test]
fn area_before_title_is_an_error() {
    let err = parse_release(
        "General\n\
         -------\n",
    )
    .unwrap_err();
    assert_eq!(err, ParseError::HeadingBeforeTitle { line: 1 });
}

#[test]
fn overline_style_is_rejected() {
    let err = parse_release(
        "======\n\
         1.20.7\n\
         ======\n",
    )
    .unwrap_err();
    assert_eq!(err, ParseError::OrphanAdornment { line: 1 });
}

#[test]
fn duplicate_title_is_an_error() {
    let err = parse_release(
        "1.2.0\n\
         =====\n\
         \n\
         1.2.1\n\
         =====\n",
    )
    .unwrap_err();
    assert_eq!(err, ParseError::DuplicateTitle { line: 4 });
}

#[test]
fn prose_without_adornment_is_stray_text() {
    let err = parse_release(
        "1.2.0\n\
         =====\n\
         \n\
         some stray paragraph\n",
    )
    .unwrap_err();
    assert_eq!(err, ParseError::StrayText { line: 4 });
}

#[test]
fn missing_title_with_only_bullets() {
    // First line is a bullet, so no category exists yet.
    let err = parse_release("- Deletion: no headings at all\n").unwrap_err();
    assert_eq!(err, ParseError::EntryOutsideCategory { line: 1 });
}
