use serde::{Deserialize, Serialize};

/// A parsed release-notes document.
///
/// Entries are immutable historical records: they are written once when a
/// release is published and never mutated afterwards. Document order is
/// preserved end-to-end so that rendering reproduces the source layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNotes {
    /// Release version, taken from the document title (e.g. "1.20.7").
    pub version: String,

    #[serde(default)]
    pub sections: Vec<AreaSection>,

    /// Source position of the title heading. Diagnostic only, not exported.
    #[serde(skip)]
    pub title_span: Option<HeadingSpan>,
}

impl ReleaseNotes {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            sections: vec![],
            title_span: None,
        }
    }

    /// Total number of entries across all areas and categories.
    pub fn entry_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.groups)
            .map(|g| g.entries.len())
            .sum()
    }

    /// Iterate entries in document order, with their owning area and category.
    pub fn iter_entries(&self) -> impl Iterator<Item = (&Area, &Category, &Entry)> {
        self.sections.iter().flat_map(|s| {
            s.groups
                .iter()
                .flat_map(move |g| g.entries.iter().map(move |e| (&s.area, &g.category, e)))
        })
    }
}

/// One area section (`General`, `Clients`) with its category groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSection {
    pub area: Area,

    #[serde(default)]
    pub groups: Vec<CategoryGroup>,

    #[serde(skip)]
    pub span: Option<HeadingSpan>,
}

/// One category group (`Features`, `Enhancements`, `Bugs`) with its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,

    #[serde(default)]
    pub entries: Vec<Entry>,

    #[serde(skip)]
    pub span: Option<HeadingSpan>,
}

/// A single release-note bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Leading subsystem label of the bullet (e.g. "Core & Internals").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    /// Human description of the change.
    pub summary: String,

    /// Traceability link into the external issue tracker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueRef>,

    /// 1-based source line of the bullet, when parsed from a file.
    #[serde(skip)]
    pub line: Option<u64>,

    /// Raw bullet text as found, kept only when it deviates from the
    /// canonical grammar. `None` means the source line was canonical.
    #[serde(skip)]
    pub raw: Option<String>,
}

impl Entry {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            component: None,
            summary: summary.into(),
            issue: None,
            line: None,
            raw: None,
        }
    }
}

/// Reference to an issue in the external tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub number: u64,
    pub url: String,
}

/// Source position of a heading: the title line plus its adornment length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSpan {
    /// 1-based line number of the title text.
    pub line: u64,
    /// Character count of the adornment line underneath the title.
    pub adornment_len: u64,
}

/// Subsystem grouping within a release file.
///
/// The format treats this as enum-like free text; unknown names are preserved
/// so the linter can flag them without the parser losing information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Area {
    General,
    Clients,
    Other(String),
}

impl Area {
    pub fn as_str(&self) -> &str {
        match self {
            Area::General => "General",
            Area::Clients => "Clients",
            Area::Other(s) => s,
        }
    }

    /// Position in the canonical section order, if this is a known area.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Area::General => Some(0),
            Area::Clients => Some(1),
            Area::Other(_) => None,
        }
    }
}

impl From<String> for Area {
    fn from(s: String) -> Self {
        match s.as_str() {
            "General" => Area::General,
            "Clients" => Area::Clients,
            _ => Area::Other(s),
        }
    }
}

impl From<Area> for String {
    fn from(a: Area) -> Self {
        a.as_str().to_string()
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nature of a change within an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Features,
    Enhancements,
    Bugs,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Features => "Features",
            Category::Enhancements => "Enhancements",
            Category::Bugs => "Bugs",
            Category::Other(s) => s,
        }
    }

    /// Position in the canonical category order, if this is a known category.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Category::Features => Some(0),
            Category::Enhancements => Some(1),
            Category::Bugs => Some(2),
            Category::Other(_) => None,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Features" => Category::Features,
            "Enhancements" => Category::Enhancements,
            "Bugs" => Category::Bugs,
            _ => Category::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
