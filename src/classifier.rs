//! Subject classification by code prefix

use crate::config::PrefixRule;
use crate::types::Classification;

/// Maps subject codes to a category and normal direction using an ordered
/// prefix-rule table. Longest matching prefix wins; rule order breaks ties.
/// Classification is deterministic for the lifetime of the classifier.
#[derive(Debug, Clone)]
pub struct SubjectClassifier {
    /// Rules sorted longest-prefix-first, original order preserved within
    /// one length
    rules: Vec<PrefixRule>,
}

impl SubjectClassifier {
    /// Build a classifier from a rule table
    pub fn new(rules: &[PrefixRule]) -> Self {
        let mut rules = rules.to_vec();
        // Stable sort keeps the configured order among equal-length prefixes
        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { rules }
    }

    /// Classify a subject code. Falls back to `Unknown` when no prefix
    /// matches.
    pub fn classify(&self, subject_code: &str) -> Classification {
        for rule in &self.rules {
            if subject_code.starts_with(&rule.prefix) {
                return Classification::Known {
                    category: rule.category,
                    direction: rule.category.normal_side(),
                };
            }
        }
        Classification::Unknown
    }
}
