//! Input shape validation
//!
//! The loader owns parsing and typing; these checks catch the structural
//! problems that survive it (blank identifiers, malformed codes, years the
//! data cannot plausibly hold). Any failure here aborts the run before a
//! single rule executes - findings over a misshapen table cannot be trusted.

use crate::types::{AuditError, AuditResult, BalanceRecord, VoucherDetailRecord};

const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Validate the balance table, failing on the first misshapen row
pub fn check_balance_shape(rows: &[BalanceRecord]) -> AuditResult<()> {
    for (index, row) in rows.iter().enumerate() {
        check_identifier("balance", index, "company", &row.company)?;
        check_identifier("balance", index, "period", &row.period)?;
        check_subject_code("balance", index, &row.subject_code)?;
        if !YEAR_RANGE.contains(&row.year) {
            return Err(shape_error(
                "balance",
                index,
                format!("year {} outside the plausible range", row.year),
            ));
        }
    }
    Ok(())
}

/// Validate the voucher table, failing on the first misshapen row
pub fn check_voucher_shape(rows: &[VoucherDetailRecord]) -> AuditResult<()> {
    for (index, row) in rows.iter().enumerate() {
        check_identifier("voucher", index, "company", &row.company)?;
        check_identifier("voucher", index, "voucher_no", &row.voucher_no)?;
        check_subject_code("voucher", index, &row.subject_code)?;
    }
    Ok(())
}

fn check_identifier(
    dataset: &'static str,
    index: usize,
    field: &str,
    value: &str,
) -> AuditResult<()> {
    if value.trim().is_empty() {
        return Err(shape_error(dataset, index, format!("{field} is empty")));
    }
    Ok(())
}

fn check_subject_code(dataset: &'static str, index: usize, code: &str) -> AuditResult<()> {
    if code.trim().is_empty() {
        return Err(shape_error(dataset, index, "subject_code is empty".into()));
    }
    if code.split('.').any(|segment| segment.is_empty()) {
        return Err(shape_error(
            dataset,
            index,
            format!("subject_code {code:?} has an empty segment"),
        ));
    }
    Ok(())
}

fn shape_error(dataset: &'static str, index: usize, detail: String) -> AuditError {
    AuditError::DataShape {
        dataset,
        detail: format!("row {index}: {detail}"),
    }
}
