//! Parent/child rollup correctness

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

use crate::config::UnknownPolicy;
use crate::hierarchy::SubjectHierarchy;
use crate::report::{FindingCollector, FindingKind, Severity, ValidationFinding, ValidationRule};
use crate::types::{BalanceRecord, BalanceSide, Classification};
use crate::validators::{group_by_company_period, ValidationContext};

/// How children aggregate into a parent, selected once per parent from the
/// classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupPolicy {
    /// Children contribute their balance positively when their normal
    /// direction matches the parent's and negated otherwise, so opposing
    /// sub-accounts net out instead of double counting.
    Netted(BalanceSide),
    /// Plain sums, field by field, no netting. Used when the parent or a
    /// child could not be classified; mismatches carry warning severity.
    Literal,
}

impl RollupPolicy {
    /// Pick the policy for one parent and its direct children
    fn select(
        ctx: &ValidationContext<'_>,
        parent: &BalanceRecord,
        children: &[&BalanceRecord],
    ) -> Option<RollupPolicy> {
        let classifications: Vec<Classification> = std::iter::once(parent)
            .chain(children.iter().copied())
            .map(|row| ctx.classifier.classify(&row.subject_code))
            .collect();

        if let Some(direction) = classifications[0].direction() {
            if classifications[1..].iter().all(|c| c.direction().is_some()) {
                return Some(RollupPolicy::Netted(direction));
            }
        }
        match ctx.config.unknown_policy {
            UnknownPolicy::DegradeToWarning => Some(RollupPolicy::Literal),
            UnknownPolicy::Exclude => None,
        }
    }
}

/// Checks that every parent subject equals the aggregation of its direct
/// children, per (company, period), over non-dimension rows.
///
/// Parents are visited deepest-first, one level at a time; a failure at a
/// deeper level never suppresses the levels above it, so every finding is
/// self-contained.
pub fn check_hierarchy_rollup(
    ctx: &ValidationContext<'_>,
    rows: &[BalanceRecord],
    out: &mut FindingCollector,
) {
    for (_, scope_rows) in group_by_company_period(rows) {
        let mut by_code: BTreeMap<&str, &BalanceRecord> = BTreeMap::new();
        for row in &scope_rows {
            by_code.insert(row.subject_code.as_str(), row);
        }
        let forest = SubjectHierarchy::build(by_code.keys().copied());

        for parent_code in forest.parents_bottom_up() {
            let parent = by_code[parent_code];
            let children: Vec<&BalanceRecord> = forest
                .children(parent_code)
                .iter()
                .map(|code| by_code[code.as_str()])
                .collect();

            match RollupPolicy::select(ctx, parent, &children) {
                Some(RollupPolicy::Netted(direction)) => {
                    check_netted(ctx, parent, &children, direction, out);
                }
                Some(RollupPolicy::Literal) => {
                    check_literal(ctx, parent, &children, out);
                }
                None => {}
            }
        }
    }
}

fn check_netted(
    ctx: &ValidationContext<'_>,
    parent: &BalanceRecord,
    children: &[&BalanceRecord],
    direction: BalanceSide,
    out: &mut FindingCollector,
) {
    // A child whose normal direction opposes the parent's carries its
    // balance with a flipped sign in the parent's frame.
    let toward_parent = |child: &BalanceRecord, value: &BigDecimal| -> BigDecimal {
        let child_direction = ctx
            .classifier
            .classify(&child.subject_code)
            .direction()
            .unwrap_or(direction);
        if child_direction == direction {
            value.clone()
        } else {
            -value.clone()
        }
    };

    let sum = |field: &dyn Fn(&BalanceRecord) -> BigDecimal| -> BigDecimal {
        children
            .iter()
            .map(|&child| toward_parent(child, &field(child)))
            .sum()
    };

    let comparisons: [(&str, BigDecimal, BigDecimal); 3] = [
        (
            "opening balance",
            sum(&|r: &BalanceRecord| r.opening_balance.clone()),
            parent.opening_balance.clone(),
        ),
        (
            "period turnover",
            children
                .iter()
                .map(|child| child.signed_turnover(direction))
                .sum(),
            parent.signed_turnover(direction),
        ),
        (
            "closing balance",
            sum(&|r: &BalanceRecord| r.closing_balance.clone()),
            parent.closing_balance.clone(),
        ),
    ];

    for (field, expected, actual) in comparisons {
        if ctx.within_tolerance(&actual, &expected) {
            out.record_pass(ValidationRule::HierarchyRollup);
        } else {
            out.record(rollup_finding(
                parent,
                field,
                expected,
                actual,
                Severity::Error,
                FindingKind::NumericMismatch,
            ));
        }
    }
}

fn check_literal(
    ctx: &ValidationContext<'_>,
    parent: &BalanceRecord,
    children: &[&BalanceRecord],
    out: &mut FindingCollector,
) {
    let sum = |field: &dyn Fn(&BalanceRecord) -> BigDecimal| -> BigDecimal {
        children.iter().map(|&child| field(child)).sum()
    };

    let comparisons: [(&str, BigDecimal, BigDecimal); 4] = [
        (
            "opening balance",
            sum(&|r: &BalanceRecord| r.opening_balance.clone()),
            parent.opening_balance.clone(),
        ),
        (
            "debit turnover",
            sum(&|r: &BalanceRecord| r.debit_turnover.clone()),
            parent.debit_turnover.clone(),
        ),
        (
            "credit turnover",
            sum(&|r: &BalanceRecord| r.credit_turnover.clone()),
            parent.credit_turnover.clone(),
        ),
        (
            "closing balance",
            sum(&|r: &BalanceRecord| r.closing_balance.clone()),
            parent.closing_balance.clone(),
        ),
    ];

    for (field, expected, actual) in comparisons {
        if ctx.within_tolerance(&actual, &expected) {
            out.record_pass(ValidationRule::HierarchyRollup);
        } else {
            out.record(rollup_finding(
                parent,
                field,
                expected,
                actual,
                Severity::Warning,
                FindingKind::ClassificationUnknown,
            ));
        }
    }
}

fn rollup_finding(
    parent: &BalanceRecord,
    field: &str,
    expected: BigDecimal,
    actual: BigDecimal,
    severity: Severity,
    kind: FindingKind,
) -> ValidationFinding {
    let message = format!(
        "Subject {} ({}): {} {} does not match the child aggregate {}",
        parent.subject_code, parent.subject_name, field, actual, expected,
    );
    ValidationFinding::new(
        ValidationRule::HierarchyRollup,
        severity,
        kind,
        &parent.company,
        &parent.period,
        message,
    )
    .with_subject(&parent.subject_code)
    .with_amounts(expected, actual)
}
