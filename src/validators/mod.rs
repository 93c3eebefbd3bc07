//! The validation rules.
//!
//! Each rule is a free function over the shared read-only datasets writing
//! into its own [`FindingCollector`](crate::report::FindingCollector); the
//! engine merges the buffers in rule order. Rules share nothing mutable, so
//! they can run in any order (or concurrently) with identical results.

mod continuity;
mod equation;
mod hierarchy;
mod reconciliation;

pub use continuity::check_year_continuity;
pub use equation::{check_accounting_equation, check_balance_integrity};
pub use hierarchy::{check_hierarchy_rollup, RollupPolicy};
pub use reconciliation::check_voucher_reconciliation;

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

use crate::classifier::SubjectClassifier;
use crate::config::AuditConfig;
use crate::types::BalanceRecord;

/// Everything a rule needs besides the datasets themselves
pub struct ValidationContext<'a> {
    pub config: &'a AuditConfig,
    pub classifier: &'a SubjectClassifier,
}

impl ValidationContext<'_> {
    /// Whether two figures agree within the configured tolerance
    pub fn within_tolerance(&self, a: &BigDecimal, b: &BigDecimal) -> bool {
        (a - b).abs() <= self.config.tolerance
    }
}

/// Group subject-level (non-dimension) balance rows by (company, period),
/// in deterministic key order
pub(crate) fn group_by_company_period<'a>(
    rows: &'a [BalanceRecord],
) -> BTreeMap<(&'a str, &'a str), Vec<&'a BalanceRecord>> {
    let mut groups: BTreeMap<(&str, &str), Vec<&BalanceRecord>> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.is_dimension_row()) {
        groups
            .entry((row.company.as_str(), row.period.as_str()))
            .or_default()
            .push(row);
    }
    groups
}
