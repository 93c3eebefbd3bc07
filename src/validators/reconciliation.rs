//! Voucher-detail to balance-table reconciliation

use bigdecimal::BigDecimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::hierarchy::SubjectHierarchy;
use crate::report::{FindingCollector, FindingKind, Severity, ValidationFinding, ValidationRule};
use crate::types::{BalanceRecord, VoucherDetailRecord};
use crate::validators::ValidationContext;

/// Checks that voucher-line sums agree with the balance table's period
/// turnover, per (company, fiscal year, subject).
///
/// Two structural cases are reported separately from numeric mismatches:
/// voucher postings with no balance row at all (error), and a leaf balance
/// subject with movement but no voucher lines even though the voucher table
/// covers that company and year (warning).
pub fn check_voucher_reconciliation(
    ctx: &ValidationContext<'_>,
    balances: &[BalanceRecord],
    vouchers: &[VoucherDetailRecord],
    out: &mut FindingCollector,
) {
    // Voucher sums per (company, year, subject)
    let mut voucher_sums: BTreeMap<(&str, i32, &str), (BigDecimal, BigDecimal)> = BTreeMap::new();
    let mut voucher_coverage: BTreeSet<(&str, i32)> = BTreeSet::new();
    for line in vouchers {
        let year = line.fiscal_year();
        voucher_coverage.insert((line.company.as_str(), year));
        let entry = voucher_sums
            .entry((line.company.as_str(), year, line.subject_code.as_str()))
            .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
        entry.0 += &line.debit_amount;
        entry.1 += &line.credit_amount;
    }

    // Aggregate balance rows per (company, year, subject); only leaf
    // subjects appear in voucher detail, summary levels are rolled up by
    // the hierarchy rule instead.
    let mut balance_by_key: BTreeMap<(&str, i32, &str), &BalanceRecord> = BTreeMap::new();
    let mut codes_by_scope: BTreeMap<(&str, i32), Vec<&str>> = BTreeMap::new();
    for row in balances.iter().filter(|r| !r.is_dimension_row()) {
        balance_by_key
            .entry((row.company.as_str(), row.year, row.subject_code.as_str()))
            .or_insert(row);
        codes_by_scope
            .entry((row.company.as_str(), row.year))
            .or_default()
            .push(row.subject_code.as_str());
    }
    let forests: BTreeMap<(&str, i32), SubjectHierarchy> = codes_by_scope
        .iter()
        .map(|(&scope, codes)| (scope, SubjectHierarchy::build(codes.iter().copied())))
        .collect();

    for (&(company, year, subject_code), (debit_sum, credit_sum)) in &voucher_sums {
        let Some(balance) = balance_by_key.get(&(company, year, subject_code)) else {
            let message = format!(
                "Subject {subject_code}: {year} voucher postings \
                 (debit {debit_sum} / credit {credit_sum}) have no balance row",
            );
            out.record(
                ValidationFinding::new(
                    ValidationRule::VoucherReconciliation,
                    Severity::Error,
                    FindingKind::StructuralAbsence,
                    company,
                    year.to_string(),
                    message,
                )
                .with_subject(subject_code),
            );
            continue;
        };

        for (side, voucher_total, balance_turnover) in [
            ("debit", debit_sum, &balance.debit_turnover),
            ("credit", credit_sum, &balance.credit_turnover),
        ] {
            if ctx.within_tolerance(voucher_total, balance_turnover) {
                out.record_pass(ValidationRule::VoucherReconciliation);
            } else {
                let message = format!(
                    "Subject {subject_code} ({}): voucher {side} total {voucher_total} \
                     does not reconcile with balance {side} turnover {balance_turnover}",
                    balance.subject_name,
                );
                out.record(
                    ValidationFinding::new(
                        ValidationRule::VoucherReconciliation,
                        Severity::Error,
                        FindingKind::NumericMismatch,
                        company,
                        &balance.period,
                        message,
                    )
                    .with_subject(subject_code)
                    .with_amounts(balance_turnover.clone(), voucher_total.clone()),
                );
            }
        }
    }

    // Reverse direction: movement in the books with no voucher lines behind it
    let zero = BigDecimal::from(0);
    for (&(company, year, subject_code), &balance) in &balance_by_key {
        if !voucher_coverage.contains(&(company, year)) {
            continue;
        }
        if voucher_sums.contains_key(&(company, year, subject_code)) {
            continue;
        }
        let is_leaf = forests
            .get(&(company, year))
            .map(|forest| forest.is_leaf(subject_code))
            .unwrap_or(true);
        if !is_leaf {
            continue;
        }
        if balance.debit_turnover == zero && balance.credit_turnover == zero {
            continue;
        }
        let message = format!(
            "Subject {subject_code} ({}): balance turnover \
             (debit {} / credit {}) has no voucher postings in {year}",
            balance.subject_name, balance.debit_turnover, balance.credit_turnover,
        );
        out.record(
            ValidationFinding::new(
                ValidationRule::VoucherReconciliation,
                Severity::Warning,
                FindingKind::StructuralAbsence,
                company,
                &balance.period,
                message,
            )
            .with_subject(subject_code),
        );
    }
}
