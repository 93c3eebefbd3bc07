//! Subject hierarchy derived from dot-segmented codes

use std::collections::{BTreeMap, BTreeSet};

/// A forest over the distinct subject codes of one (company, period) scope.
///
/// Code "1002" is the parent of "1002.01" and, transitively, "1002.01.01".
/// The *direct* parent of a code is the longest strictly-shorter segment
/// prefix actually present in the scope, so "1002.01.01" attaches straight
/// to "1002" when "1002.01" carries no row of its own.
#[derive(Debug, Clone, Default)]
pub struct SubjectHierarchy {
    children: BTreeMap<String, Vec<String>>,
    codes: BTreeSet<String>,
}

impl SubjectHierarchy {
    /// Build the forest from the distinct codes present in one scope
    pub fn build<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: BTreeSet<String> = codes
            .into_iter()
            .map(|code| code.as_ref().to_string())
            .collect();

        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for code in &codes {
            if let Some(parent) = direct_parent(code, &codes) {
                children.entry(parent).or_default().push(code.clone());
            }
        }
        // BTreeSet iteration already yields sorted codes, so child lists
        // come out sorted as well.

        Self { children, codes }
    }

    /// Direct children of a code, sorted; empty when the code is a leaf
    pub fn children(&self, code: &str) -> &[String] {
        self.children
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the code has no children in this scope
    pub fn is_leaf(&self, code: &str) -> bool {
        !self.children.contains_key(code)
    }

    /// Codes with no parent in this scope, sorted
    pub fn roots(&self) -> Vec<&str> {
        self.codes
            .iter()
            .filter(|code| direct_parent(code, &self.codes).is_none())
            .map(String::as_str)
            .collect()
    }

    /// All parent codes ordered deepest-first (then lexicographically), for
    /// bottom-up checking: a parent is visited only after every parent one
    /// level further down.
    pub fn parents_bottom_up(&self) -> Vec<&str> {
        let mut parents: Vec<&str> = self.children.keys().map(String::as_str).collect();
        parents.sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));
        parents
    }

    /// Whether any rows at all entered the forest
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn depth(code: &str) -> usize {
    code.split('.').count()
}

/// Longest strictly-shorter segment prefix of `code` present in `codes`
fn direct_parent(code: &str, codes: &BTreeSet<String>) -> Option<String> {
    let segments: Vec<&str> = code.split('.').collect();
    for take in (1..segments.len()).rev() {
        let candidate = segments[..take].join(".");
        if codes.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}
