//! Exclusion rules matched against source-relative path segments

use std::path::Path;

/// An unordered set of literal exclusion rules.
///
/// A path is excluded when any rule equals, or is contained in, any single
/// component of its source-relative path. Rules are plain substrings, not
/// globs or regexes, and matching is OR-combined across the set.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    rules: Vec<String>,
}

impl ExcludeSet {
    /// Build a rule set, dropping empty rules.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|rule| rule.as_ref().to_string())
            .filter(|rule| !rule.is_empty())
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when any rule matches any segment of `relative`.
    ///
    /// An empty rule set never excludes anything.
    pub fn matches(&self, relative: &Path) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        relative.components().any(|component| {
            let segment = component.as_os_str().to_string_lossy();
            self.rules.iter().any(|rule| segment.contains(rule.as_str()))
        })
    }
}
