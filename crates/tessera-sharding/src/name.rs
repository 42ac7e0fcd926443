//! Case-insensitive name helpers.
//!
//! Logical table names and binding references compare case-insensitively
//! throughout the engine; registry resource names do not. These helpers make
//! the case-insensitive comparisons explicit instead of relying on callers
//! lowercasing ad hoc.

use std::collections::BTreeSet;

/// A set of names compared case-insensitively.
///
/// Keys are normalized to lowercase on insert and lookup; the original
/// spellings are not retained, callers keep those where needed for messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveSet {
    inner: BTreeSet<String>,
}

impl CaseInsensitiveSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name. Returns `false` if an equal-ignoring-case name was present.
    pub fn insert(&mut self, name: &str) -> bool {
        self.inner.insert(name.to_lowercase())
    }

    /// Whether the set contains a name, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(&name.to_lowercase())
    }

    /// Remove a name, ignoring case. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.inner.remove(&name.to_lowercase())
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for CaseInsensitiveSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Names that occur more than once in `names`, ignoring case.
///
/// Returns every offending spelling (deduplicated, in first-seen order) so an
/// error message can enumerate them all.
pub fn duplicated<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.into_iter().collect();
    let mut seen = CaseInsensitiveSet::new();
    let mut dup_keys = CaseInsensitiveSet::new();
    for name in &names {
        if !seen.insert(name) {
            dup_keys.insert(name);
        }
    }
    let mut result = Vec::new();
    for name in names {
        if dup_keys.contains(name) && !result.iter().any(|existing| existing == name) {
            result.push(name.to_string());
        }
    }
    result
}

/// Names from `names` that are also in `existing`, ignoring case.
///
/// Preserves the spelling and order of `names`.
pub fn intersection<'a>(
    names: impl IntoIterator<Item = &'a str>,
    existing: &CaseInsensitiveSet,
) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| existing.contains(name))
        .map(str::to_string)
        .collect()
}

/// Names from `names` that are missing from `existing`, ignoring case.
pub fn missing_from<'a>(
    names: impl IntoIterator<Item = &'a str>,
    existing: &CaseInsensitiveSet,
) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !existing.contains(name))
        .map(str::to_string)
        .collect()
}

/// Replace every occurrence of `needle` in `haystack` with `replacement`,
/// ignoring ASCII case. Names and property expressions are ASCII in practice;
/// `to_ascii_lowercase` keeps byte offsets aligned with the original string.
pub fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let lower_haystack = haystack.to_ascii_lowercase();
    let lower_needle = needle.to_ascii_lowercase();
    let mut result = String::with_capacity(haystack.len());
    let mut start = 0;
    while let Some(found) = lower_haystack[start..].find(&lower_needle) {
        let found = start + found;
        result.push_str(&haystack[start..found]);
        result.push_str(replacement);
        start = found + needle.len();
    }
    result.push_str(&haystack[start..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_case_insensitive() {
        let mut set = CaseInsensitiveSet::new();
        assert!(set.insert("t_Order"));
        assert!(!set.insert("T_ORDER"));
        assert!(set.contains("t_order"));
        assert_eq!(set.len(), 1);
        assert!(set.remove("T_Order"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_duplicated_returns_every_spelling() {
        let dups = duplicated(["t_order", "T_ORDER", "t_item", "t_Order"]);
        assert_eq!(dups, vec!["t_order".to_string(), "T_ORDER".into(), "t_Order".into()]);
    }

    #[test]
    fn test_duplicated_empty_on_distinct_names() {
        assert!(duplicated(["t_order", "t_order_item"]).is_empty());
    }

    #[test]
    fn test_replace_ignore_ascii_case() {
        assert_eq!(
            replace_ignore_ascii_case("T_ORDER_${order_id % 2}", "t_order", "{table}"),
            "{table}_${order_id % 2}"
        );
        assert_eq!(replace_ignore_ascii_case("abcabc", "ABC", "x"), "xx");
        assert_eq!(replace_ignore_ascii_case("abc", "", "x"), "abc");
    }

    #[test]
    fn test_intersection_and_missing() {
        let existing: CaseInsensitiveSet = ["t_order", "t_item"].into_iter().collect();
        assert_eq!(
            intersection(["T_ORDER", "t_unknown"], &existing),
            vec!["T_ORDER".to_string()]
        );
        assert_eq!(
            missing_from(["T_ORDER", "t_unknown"], &existing),
            vec!["t_unknown".to_string()]
        );
    }
}
