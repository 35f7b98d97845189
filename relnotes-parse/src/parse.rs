use relnotes_types::notes::{
    Area, AreaSection, Category, CategoryGroup, Entry, HeadingSpan, IssueRef, ReleaseNotes,
};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("file is empty")]
    Empty,

    #[error("no version title found")]
    MissingTitle,

    #[error("line {line}: adornment line without a title above it")]
    OrphanAdornment { line: u64 },

    #[error("line {line}: heading before the version title")]
    HeadingBeforeTitle { line: u64 },

    #[error("line {line}: second version title (one per file)")]
    DuplicateTitle { line: u64 },

    #[error("line {line}: category heading outside an area section")]
    CategoryOutsideArea { line: u64 },

    #[error("line {line}: entry outside a category")]
    EntryOutsideCategory { line: u64 },

    #[error("line {line}: text is neither a heading nor an entry")]
    StrayText { line: u64 },
}

/// Parse one release-notes document.
///
/// Heading levels are encoded by the underline character: `=` for the
/// version title, `-` for areas, `*` for categories. Entries are single-line
/// bullets. Document order is preserved.
pub fn parse_release(source: &str) -> Result<ReleaseNotes, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let lines: Vec<&str> = source.lines().collect();
    let mut doc = ReleaseNotes::new("");

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let lineno = (i + 1) as u64;

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some(body) = line.strip_prefix("- ") {
            let group = doc
                .sections
                .last_mut()
                .and_then(|s| s.groups.last_mut())
                .ok_or(ParseError::EntryOutsideCategory { line: lineno })?;
            group.entries.push(parse_bullet(line, body, lineno));
            i += 1;
            continue;
        }

        if adornment_char(line).is_some() {
            // An adornment reaching this point was not consumed by a title
            // line above it (overline style, which the format rejects).
            return Err(ParseError::OrphanAdornment { line: lineno });
        }

        // A title is any other text followed by an adornment line.
        let Some(ch) = lines.get(i + 1).copied().and_then(adornment_char) else {
            return Err(ParseError::StrayText { line: lineno });
        };

        let title = line.trim_end();
        let span = HeadingSpan {
            line: lineno,
            adornment_len: lines[i + 1].chars().count() as u64,
        };
        trace!(title, adornment = %ch, "heading");

        match ch {
            '=' => {
                if !doc.version.is_empty() {
                    return Err(ParseError::DuplicateTitle { line: lineno });
                }
                doc.version = title.to_string();
                doc.title_span = Some(span);
            }
            '-' => {
                if doc.version.is_empty() {
                    return Err(ParseError::HeadingBeforeTitle { line: lineno });
                }
                doc.sections.push(AreaSection {
                    area: Area::from(title.to_string()),
                    groups: vec![],
                    span: Some(span),
                });
            }
            '*' => {
                let section = doc
                    .sections
                    .last_mut()
                    .ok_or(ParseError::CategoryOutsideArea { line: lineno })?;
                section.groups.push(CategoryGroup {
                    category: Category::from(title.to_string()),
                    entries: vec![],
                    span: Some(span),
                });
            }
            _ => unreachable!("adornment_char only yields = - *"),
        }

        i += 2;
    }

    if doc.version.is_empty() {
        return Err(ParseError::MissingTitle);
    }

    Ok(doc)
}

/// Returns the adornment character if the line is a run of one repeated
/// heading character.
fn adornment_char(line: &str) -> Option<char> {
    let trimmed = line.trim_end();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !matches!(first, '=' | '-' | '*') {
        return None;
    }
    // "- " bullets are handled before adornments; a lone "-" is ambiguous
    // and treated as an adornment.
    chars.all(|c| c == first).then_some(first)
}

/// Parse one bullet into an entry.
///
/// Canonical grammar: ``- <Component>: <Summary> `#<N> <URL>`_``. Deviations
/// are captured rather than rejected; `raw` keeps the source line so the
/// linter can report exactly what was found.
fn parse_bullet(full_line: &str, body: &str, line: u64) -> Entry {
    let mut deviant = false;

    let (text, issue) = match split_issue_trailer(body) {
        Some((text, issue)) => (text, Some(issue)),
        None => {
            deviant = true;
            (body, None)
        }
    };

    let (component, summary) = match text.split_once(": ") {
        Some((c, s)) if !c.is_empty() && !s.is_empty() => (Some(c.to_string()), s),
        _ => {
            deviant = true;
            (None, text)
        }
    };

    Entry {
        component,
        summary: summary.to_string(),
        issue,
        line: Some(line),
        raw: deviant.then(|| full_line.to_string()),
    }
}

/// Split ``<text> `#<N> <URL>`_`` into the text and the issue reference.
fn split_issue_trailer(body: &str) -> Option<(&str, IssueRef)> {
    let idx = body.rfind(" `#")?;
    let (text, trailer) = body.split_at(idx);

    // trailer = " `#<N> <URL>`_"
    let inner = trailer
        .strip_prefix(" `#")?
        .strip_suffix("`_")?;

    let (num, url) = inner.split_once(' ')?;
    if num.is_empty() || !num.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u64 = num.parse().ok()?;

    let url = url.strip_prefix('<')?.strip_suffix('>')?;
    if url.is_empty() {
        return None;
    }

    Some((
        text,
        IssueRef {
            number,
            url: url.to_string(),
        },
    ))
}
