//! Year-over-year opening/closing continuity

use std::collections::{BTreeMap, BTreeSet};

use crate::report::{FindingCollector, FindingKind, Severity, ValidationFinding, ValidationRule};
use crate::types::BalanceRecord;
use crate::validators::ValidationContext;

/// Checks that a subject's closing balance carries into the next year's
/// opening balance, per (company, subject) at the aggregate (non-dimension)
/// level.
///
/// A year pair is a candidate only when the company has balance data in both
/// years; a subject present in just one side of a candidate pair produces a
/// "no continuity data" warning instead of being silently skipped.
pub fn check_year_continuity(
    ctx: &ValidationContext<'_>,
    rows: &[BalanceRecord],
    out: &mut FindingCollector,
) {
    let mut company_years: BTreeMap<&str, BTreeSet<i32>> = BTreeMap::new();
    let mut by_subject: BTreeMap<(&str, &str), BTreeMap<i32, &BalanceRecord>> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.is_dimension_row()) {
        company_years
            .entry(row.company.as_str())
            .or_default()
            .insert(row.year);
        by_subject
            .entry((row.company.as_str(), row.subject_code.as_str()))
            .or_default()
            .insert(row.year, row);
    }

    for ((company, subject_code), years) in &by_subject {
        let Some(covered) = company_years.get(company) else {
            continue;
        };
        for &year in covered {
            let next = year + 1;
            if !covered.contains(&next) {
                continue;
            }
            match (years.get(&year), years.get(&next)) {
                (Some(prev), Some(curr)) => {
                    if ctx.within_tolerance(&prev.closing_balance, &curr.opening_balance) {
                        out.record_pass(ValidationRule::YearContinuity);
                    } else {
                        let message = format!(
                            "Subject {subject_code}: closing balance {} for {year} does not \
                             carry into opening balance {} for {next}",
                            prev.closing_balance, curr.opening_balance,
                        );
                        out.record(
                            ValidationFinding::new(
                                ValidationRule::YearContinuity,
                                Severity::Error,
                                FindingKind::NumericMismatch,
                                *company,
                                &curr.period,
                                message,
                            )
                            .with_subject(*subject_code)
                            .with_amounts(
                                prev.closing_balance.clone(),
                                curr.opening_balance.clone(),
                            ),
                        );
                    }
                }
                (Some(prev), None) => {
                    out.record(no_data_finding(
                        company,
                        &prev.period,
                        subject_code,
                        format!(
                            "Subject {subject_code}: present in {year} but missing in {next}, \
                             no continuity data",
                        ),
                    ));
                }
                (None, Some(curr)) => {
                    out.record(no_data_finding(
                        company,
                        &curr.period,
                        subject_code,
                        format!(
                            "Subject {subject_code}: present in {next} but missing in {year}, \
                             no continuity data",
                        ),
                    ));
                }
                (None, None) => {}
            }
        }
    }
}

fn no_data_finding(
    company: &str,
    period: &str,
    subject_code: &str,
    message: String,
) -> ValidationFinding {
    ValidationFinding::new(
        ValidationRule::YearContinuity,
        Severity::Warning,
        FindingKind::StructuralAbsence,
        company,
        period,
        message,
    )
    .with_subject(subject_code)
}
