//! Run configuration: tolerance, classification rules, rule toggles

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::AccountCategory;

/// One subject-code prefix rule. Longest matching prefix wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    /// Code prefix, e.g. "1" or "2202"
    pub prefix: String,
    /// Category assigned to codes under this prefix
    pub category: AccountCategory,
}

impl PrefixRule {
    pub fn new(prefix: impl Into<String>, category: AccountCategory) -> Self {
        Self {
            prefix: prefix.into(),
            category,
        }
    }
}

/// How checks that need a classification behave for unknown subject codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownPolicy {
    /// Degrade to warning-severity exact-match checks (no netting)
    #[default]
    DegradeToWarning,
    /// Leave unknown subjects out of direction-dependent checks entirely
    Exclude,
}

/// Which validation rules a run executes. All five are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleToggles {
    pub balance_integrity: bool,
    pub accounting_equation: bool,
    pub year_continuity: bool,
    pub hierarchy_rollup: bool,
    pub voucher_reconciliation: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            balance_integrity: true,
            accounting_equation: true,
            year_continuity: true,
            hierarchy_rollup: true,
            voucher_reconciliation: true,
        }
    }
}

/// Configuration handed to the engine at construction.
///
/// Tolerance and the prefix-rule table are explicit here rather than
/// ambient constants; every validator reads them through this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Absolute tolerance for every equality check, in currency units
    pub tolerance: BigDecimal,
    /// Subject-code prefix rules, longest-prefix-match
    pub prefix_rules: Vec<PrefixRule>,
    /// Policy for subjects no rule matches
    pub unknown_policy: UnknownPolicy,
    /// Which rules to run
    pub rules: RuleToggles,
}

impl AuditConfig {
    /// One cent, the tolerance the source data was reconciled under
    pub fn default_tolerance() -> BigDecimal {
        BigDecimal::from_str("0.01").expect("static literal")
    }

    /// Standard chart-of-accounts prefixes: 1 assets, 2 liabilities,
    /// 3 equity, 4 income, 5 and 6 expense/profit-and-loss.
    pub fn standard_prefix_rules() -> Vec<PrefixRule> {
        vec![
            PrefixRule::new("1", AccountCategory::Asset),
            PrefixRule::new("2", AccountCategory::Liability),
            PrefixRule::new("3", AccountCategory::Equity),
            PrefixRule::new("4", AccountCategory::Income),
            PrefixRule::new("5", AccountCategory::Expense),
            PrefixRule::new("6", AccountCategory::Expense),
        ]
    }

    /// Replace the tolerance
    pub fn with_tolerance(mut self, tolerance: BigDecimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Replace the rule toggles
    pub fn with_rules(mut self, rules: RuleToggles) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the unknown-category policy
    pub fn with_unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::default_tolerance(),
            prefix_rules: Self::standard_prefix_rules(),
            unknown_policy: UnknownPolicy::default(),
            rules: RuleToggles::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_runs_everything() {
        let config = AuditConfig::default();
        assert!(config.rules.balance_integrity);
        assert!(config.rules.voucher_reconciliation);
        assert_eq!(config.tolerance, AuditConfig::default_tolerance());
        assert_eq!(config.unknown_policy, UnknownPolicy::DegradeToWarning);
        assert_eq!(config.prefix_rules.len(), 6);
    }

    #[test]
    fn builder_style_overrides() {
        let config = AuditConfig::default()
            .with_unknown_policy(UnknownPolicy::Exclude)
            .with_rules(RuleToggles {
                hierarchy_rollup: false,
                ..RuleToggles::default()
            });
        assert_eq!(config.unknown_policy, UnknownPolicy::Exclude);
        assert!(!config.rules.hierarchy_rollup);
        assert!(config.rules.year_continuity);
    }
}
