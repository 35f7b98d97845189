use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordered key for release versions.
///
/// Versions are dotted numerics with an optional trailing pre-release tag
/// ("1.20.7", "1.20.4rc1"). Comparison is numeric per component; a
/// pre-release sorts before the final release with the same components.
/// Strings that do not start with a digit fall back to lexical ordering on
/// the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VersionKey {
    raw: String,
    nums: Vec<u64>,
    pre: Option<String>,
}

impl VersionKey {
    pub fn parse(raw: &str) -> Self {
        let mut nums = Vec::new();
        let mut pre = None;

        for (i, segment) in raw.split('.').enumerate() {
            let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                // "rc1" as its own segment, or a non-numeric version string.
                if i > 0 || !segment.is_empty() {
                    pre = Some(segment.to_string());
                }
                break;
            }
            // Numeric prefix always fits; release components are small.
            nums.push(digits.parse().unwrap_or(u64::MAX));

            let rest = &segment[digits.len()..];
            if !rest.is_empty() {
                pre = Some(rest.to_string());
                break;
            }
        }

        Self {
            raw: raw.to_string(),
            nums,
            pre,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if the raw text parsed as a dotted-numeric version.
    pub fn is_numeric(&self) -> bool {
        !self.nums.is_empty()
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nums
            .cmp(&other.nums)
            // No pre-release tag sorts after any tag: 1.20.4rc1 < 1.20.4.
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<String> for VersionKey {
    fn from(s: String) -> Self {
        VersionKey::parse(&s)
    }
}

impl From<VersionKey> for String {
    fn from(v: VersionKey) -> Self {
        v.raw
    }
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_components_compare_numerically() {
        assert!(VersionKey::parse("1.9.0") < VersionKey::parse("1.10.0"));
        assert!(VersionKey::parse("1.20.7") > VersionKey::parse("1.20.4"));
        assert!(VersionKey::parse("2.0.0") > VersionKey::parse("1.99.99"));
    }

    #[test]
    fn prerelease_sorts_before_final() {
        assert!(VersionKey::parse("1.20.4rc1") < VersionKey::parse("1.20.4"));
        assert!(VersionKey::parse("1.20.4rc1") < VersionKey::parse("1.20.4rc2"));
        assert!(VersionKey::parse("1.20.4rc1") > VersionKey::parse("1.20.3"));
    }

    #[test]
    fn non_numeric_falls_back_to_lexical() {
        let a = VersionKey::parse("alpha");
        let b = VersionKey::parse("beta");
        assert!(!a.is_numeric());
        assert!(a < b);
    }

    #[test]
    fn dotted_prerelease_segment() {
        assert!(VersionKey::parse("1.20.rc1") < VersionKey::parse("1.20.0"));
    }
}
