//! Row-level balance integrity and the per-period accounting equation

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

use crate::config::UnknownPolicy;
use crate::hierarchy::SubjectHierarchy;
use crate::report::{FindingCollector, FindingKind, Severity, ValidationFinding, ValidationRule};
use crate::types::{AccountCategory, BalanceRecord, BalanceSide, Classification};
use crate::validators::{group_by_company_period, ValidationContext};

/// Checks `closing = opening + signed turnover` for every balance row,
/// dimension rows included. The turnover is signed toward the subject's
/// normal direction, so the one formula covers all five categories.
pub fn check_balance_integrity(
    ctx: &ValidationContext<'_>,
    rows: &[BalanceRecord],
    out: &mut FindingCollector,
) {
    for row in rows {
        match ctx.classifier.classify(&row.subject_code) {
            Classification::Known { direction, .. } => {
                let expected = &row.opening_balance + row.signed_turnover(direction);
                if ctx.within_tolerance(&row.closing_balance, &expected) {
                    out.record_pass(ValidationRule::BalanceIntegrity);
                } else {
                    out.record(integrity_finding(row, expected, Severity::Error));
                }
            }
            Classification::Unknown => match ctx.config.unknown_policy {
                UnknownPolicy::Exclude => {}
                UnknownPolicy::DegradeToWarning => {
                    // Direction undetermined: accept whichever signing of the
                    // turnover closes the relation, warn when neither does.
                    let debit_view =
                        &row.opening_balance + row.signed_turnover(BalanceSide::Debit);
                    let credit_view =
                        &row.opening_balance + row.signed_turnover(BalanceSide::Credit);
                    if ctx.within_tolerance(&row.closing_balance, &debit_view)
                        || ctx.within_tolerance(&row.closing_balance, &credit_view)
                    {
                        out.record_pass(ValidationRule::BalanceIntegrity);
                    } else {
                        let mut finding =
                            integrity_finding(row, debit_view, Severity::Warning);
                        finding.kind = FindingKind::ClassificationUnknown;
                        out.record(finding);
                    }
                }
            },
        }
    }
}

fn integrity_finding(
    row: &BalanceRecord,
    expected: BigDecimal,
    severity: Severity,
) -> ValidationFinding {
    let dimension = row
        .dimension_name
        .as_deref()
        .map(|name| format!(" [{name}]"))
        .unwrap_or_default();
    let message = format!(
        "Subject {} ({}){}: closing balance {} differs from opening plus period movement {}",
        row.subject_code, row.subject_name, dimension, row.closing_balance, expected,
    );
    ValidationFinding::new(
        ValidationRule::BalanceIntegrity,
        severity,
        FindingKind::NumericMismatch,
        &row.company,
        &row.period,
        message,
    )
    .with_subject(&row.subject_code)
    .with_amounts(expected, row.closing_balance.clone())
}

/// Checks `assets - liabilities - equity - (income - expense) = 0` per
/// (company, period) over closing balances.
///
/// Only root rows enter the partition: summing every row would count each
/// parent and its children twice. Categories with no rows contribute zero
/// rather than being skipped, so a one-sided period still surfaces.
pub fn check_accounting_equation(
    ctx: &ValidationContext<'_>,
    rows: &[BalanceRecord],
    out: &mut FindingCollector,
) {
    for ((company, period), scope_rows) in group_by_company_period(rows) {
        let forest = SubjectHierarchy::build(scope_rows.iter().map(|r| r.subject_code.as_str()));
        let roots: std::collections::BTreeSet<&str> = forest.roots().into_iter().collect();

        let mut totals: BTreeMap<AccountCategory, BigDecimal> = BTreeMap::new();
        for row in &scope_rows {
            if !roots.contains(row.subject_code.as_str()) {
                continue;
            }
            if let Some(category) = ctx.classifier.classify(&row.subject_code).category() {
                *totals
                    .entry(category)
                    .or_insert_with(|| BigDecimal::from(0)) += &row.closing_balance;
            }
        }

        let total = |category: AccountCategory| -> BigDecimal {
            totals
                .get(&category)
                .cloned()
                .unwrap_or_else(|| BigDecimal::from(0))
        };

        let residual = total(AccountCategory::Asset)
            - total(AccountCategory::Liability)
            - total(AccountCategory::Equity)
            - (total(AccountCategory::Income) - total(AccountCategory::Expense));

        let zero = BigDecimal::from(0);
        if ctx.within_tolerance(&residual, &zero) {
            out.record_pass(ValidationRule::AccountingEquation);
        } else {
            let message = format!(
                "Accounting equation out of balance for {company} {period}: \
                 assets - liabilities - equity - net income = {residual}",
            );
            out.record(
                ValidationFinding::new(
                    ValidationRule::AccountingEquation,
                    Severity::Error,
                    FindingKind::NumericMismatch,
                    company,
                    period,
                    message,
                )
                .with_amounts(zero, residual),
            );
        }
    }
}
