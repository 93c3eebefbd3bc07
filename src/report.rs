//! Findings, the collector, and the run report

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// The five validation rules. Declaration order is run order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ValidationRule {
    /// Per-row `closing = opening + signed turnover`
    BalanceIntegrity,
    /// Per company/period `assets = liabilities + equity + (income - expense)`
    AccountingEquation,
    /// Adjacent-year opening/closing agreement
    YearContinuity,
    /// Parent balances equal the aggregation of direct children
    HierarchyRollup,
    /// Voucher sums against balance-table turnover
    VoucherReconciliation,
}

impl ValidationRule {
    /// All rules, in run order
    pub const ALL: [ValidationRule; 5] = [
        ValidationRule::BalanceIntegrity,
        ValidationRule::AccountingEquation,
        ValidationRule::YearContinuity,
        ValidationRule::HierarchyRollup,
        ValidationRule::VoucherReconciliation,
    ];

    /// Stable name used in reports and the error table
    pub fn name(&self) -> &'static str {
        match self {
            ValidationRule::BalanceIntegrity => "balance_integrity",
            ValidationRule::AccountingEquation => "accounting_equation",
            ValidationRule::YearContinuity => "year_continuity",
            ValidationRule::HierarchyRollup => "hierarchy_rollup",
            ValidationRule::VoucherReconciliation => "voucher_reconciliation",
        }
    }
}

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A check failed with full confidence
    Error,
    /// A degraded-mode or missing-data signal
    Warning,
}

/// What kind of problem a finding describes. Consumers need to tell
/// "wrong number" from "missing record" from "could not classify".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    /// Two figures that should agree diverge beyond tolerance
    NumericMismatch,
    /// A record expected on one side is absent on the other
    StructuralAbsence,
    /// The subject could not be classified, check ran in degraded mode
    ClassificationUnknown,
}

/// One validation finding. Immutable once created; the collector only
/// appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub rule: ValidationRule,
    pub severity: Severity,
    pub kind: FindingKind,
    pub company: String,
    pub period: String,
    pub subject_code: Option<String>,
    pub voucher_no: Option<String>,
    pub expected: Option<BigDecimal>,
    pub actual: Option<BigDecimal>,
    pub difference: Option<BigDecimal>,
    pub message: String,
}

impl ValidationFinding {
    /// Start a finding scoped to a company and period
    pub fn new(
        rule: ValidationRule,
        severity: Severity,
        kind: FindingKind,
        company: impl Into<String>,
        period: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            severity,
            kind,
            company: company.into(),
            period: period.into(),
            subject_code: None,
            voucher_no: None,
            expected: None,
            actual: None,
            difference: None,
            message: message.into(),
        }
    }

    /// Attach a subject code
    pub fn with_subject(mut self, subject_code: impl Into<String>) -> Self {
        self.subject_code = Some(subject_code.into());
        self
    }

    /// Attach a voucher number
    pub fn with_voucher(mut self, voucher_no: impl Into<String>) -> Self {
        self.voucher_no = Some(voucher_no.into());
        self
    }

    /// Attach expected/actual figures; the difference is derived
    pub fn with_amounts(mut self, expected: BigDecimal, actual: BigDecimal) -> Self {
        self.difference = Some(&actual - &expected);
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }
}

/// Accumulates findings and per-rule pass tallies during a run.
///
/// Each validator writes into its own collector; the engine merges them in
/// rule order, so concurrent validators never contend on shared state.
#[derive(Debug, Default)]
pub struct FindingCollector {
    findings: Vec<ValidationFinding>,
    passed: BTreeMap<ValidationRule, u64>,
    scopes: BTreeSet<(String, String)>,
}

impl FindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding. Findings are never removed or reordered.
    pub fn record(&mut self, finding: ValidationFinding) {
        self.findings.push(finding);
    }

    /// Count one passed check for a rule
    pub fn record_pass(&mut self, rule: ValidationRule) {
        *self.passed.entry(rule).or_insert(0) += 1;
    }

    /// Register a (company, period) scope seen in the input, so the report
    /// can state pass/fail even for scopes with no findings
    pub fn note_scope(&mut self, company: &str, period: &str) {
        self.scopes
            .insert((company.to_string(), period.to_string()));
    }

    /// Fold another collector's buffer into this one, preserving its order
    pub fn merge(&mut self, other: FindingCollector) {
        self.findings.extend(other.findings);
        for (rule, count) in other.passed {
            *self.passed.entry(rule).or_insert(0) += count;
        }
        self.scopes.extend(other.scopes);
    }

    /// Finish the run and freeze the report
    pub fn into_report(self) -> ValidationReport {
        ValidationReport {
            findings: self.findings,
            passed: self.passed,
            scopes: self.scopes,
        }
    }
}

/// Per-rule roll-up for the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub rule: ValidationRule,
    pub checks_passed: u64,
    pub errors: u64,
    pub warnings: u64,
}

/// Pass/fail verdict for one (company, period)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOutcome {
    pub company: String,
    pub period: String,
    pub passed: bool,
}

/// One flat row of the error table, suitable for direct tabular export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRow {
    pub rule: String,
    pub severity: Severity,
    pub kind: FindingKind,
    pub company: String,
    pub period: String,
    pub subject_code: Option<String>,
    pub voucher_no: Option<String>,
    pub expected: Option<BigDecimal>,
    pub actual: Option<BigDecimal>,
    pub difference: Option<BigDecimal>,
    pub message: String,
}

/// The frozen result of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    findings: Vec<ValidationFinding>,
    passed: BTreeMap<ValidationRule, u64>,
    scopes: BTreeSet<(String, String)>,
}

impl ValidationReport {
    /// Every finding, in the order the rules produced them
    pub fn all_findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    /// Findings for one rule, in emission order
    pub fn findings_by_rule(&self, rule: ValidationRule) -> Vec<&ValidationFinding> {
        self.findings.iter().filter(|f| f.rule == rule).collect()
    }

    /// Number of error-severity findings
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    /// Number of warning-severity findings
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// Whether the run produced no error-severity findings
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Per-rule counts of passed checks, errors and warnings
    pub fn rule_summaries(&self) -> Vec<RuleSummary> {
        ValidationRule::ALL
            .iter()
            .map(|&rule| {
                let errors = self
                    .findings
                    .iter()
                    .filter(|f| f.rule == rule && f.severity == Severity::Error)
                    .count() as u64;
                let warnings = self
                    .findings
                    .iter()
                    .filter(|f| f.rule == rule && f.severity == Severity::Warning)
                    .count() as u64;
                RuleSummary {
                    rule,
                    checks_passed: self.passed.get(&rule).copied().unwrap_or(0),
                    errors,
                    warnings,
                }
            })
            .collect()
    }

    /// Pass/fail per (company, period). A scope fails on any error-severity
    /// finding; scopes that only produced warnings still pass.
    pub fn period_outcomes(&self) -> Vec<PeriodOutcome> {
        let mut scopes = self.scopes.clone();
        for finding in &self.findings {
            scopes.insert((finding.company.clone(), finding.period.clone()));
        }
        scopes
            .into_iter()
            .map(|(company, period)| {
                let failed = self.findings.iter().any(|f| {
                    f.company == company && f.period == period && f.severity == Severity::Error
                });
                PeriodOutcome {
                    company,
                    period,
                    passed: !failed,
                }
            })
            .collect()
    }

    /// One flat row per finding, for tabular export
    pub fn error_table(&self) -> Vec<ErrorRow> {
        self.findings
            .iter()
            .map(|f| ErrorRow {
                rule: f.rule.name().to_string(),
                severity: f.severity,
                kind: f.kind,
                company: f.company.clone(),
                period: f.period.clone(),
                subject_code: f.subject_code.clone(),
                voucher_no: f.voucher_no.clone(),
                expected: f.expected.clone(),
                actual: f.actual.clone(),
                difference: f.difference.clone(),
                message: f.message.clone(),
            })
            .collect()
    }

    /// Human-readable summary: totals, per-rule counts, per-scope verdicts
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "Financial data validation report");
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(
            out,
            "Findings: {} ({} errors, {} warnings)",
            self.findings.len(),
            self.error_count(),
            self.warning_count()
        );
        let _ = writeln!(out);
        for summary in self.rule_summaries() {
            let _ = writeln!(
                out,
                "{}: passed {}, errors {}, warnings {}",
                summary.rule.name(),
                summary.checks_passed,
                summary.errors,
                summary.warnings
            );
        }
        let _ = writeln!(out);
        for outcome in self.period_outcomes() {
            let _ = writeln!(
                out,
                "{} / {}: {}",
                outcome.company,
                outcome.period,
                if outcome.passed { "PASS" } else { "FAIL" }
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn mismatch(company: &str, period: &str, severity: Severity) -> ValidationFinding {
        ValidationFinding::new(
            ValidationRule::HierarchyRollup,
            severity,
            FindingKind::NumericMismatch,
            company,
            period,
            "parent/child mismatch",
        )
        .with_subject("1002")
        .with_amounts(dec("100.00"), dec("150.00"))
    }

    #[test]
    fn difference_is_actual_minus_expected() {
        let finding = mismatch("Acme", "2024", Severity::Error);
        assert_eq!(finding.difference, Some(dec("50.00")));
    }

    #[test]
    fn collector_merge_keeps_order_and_tallies() {
        let mut a = FindingCollector::new();
        a.record(mismatch("Acme", "2024", Severity::Error));
        a.record_pass(ValidationRule::HierarchyRollup);

        let mut b = FindingCollector::new();
        b.record(mismatch("Acme", "2025", Severity::Warning));
        b.record_pass(ValidationRule::HierarchyRollup);
        b.record_pass(ValidationRule::YearContinuity);

        a.merge(b);
        let report = a.into_report();

        assert_eq!(report.all_findings().len(), 2);
        assert_eq!(report.all_findings()[0].period, "2024");
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.passed());

        let rollup = report
            .rule_summaries()
            .into_iter()
            .find(|s| s.rule == ValidationRule::HierarchyRollup)
            .unwrap();
        assert_eq!(rollup.checks_passed, 2);
        assert_eq!(rollup.errors, 1);
        assert_eq!(rollup.warnings, 0);
    }

    #[test]
    fn warnings_do_not_fail_a_period() {
        let mut collector = FindingCollector::new();
        collector.note_scope("Acme", "2023");
        collector.record(mismatch("Acme", "2024", Severity::Error));
        collector.record(mismatch("Acme", "2025", Severity::Warning));
        let report = collector.into_report();

        let outcomes = report.period_outcomes();
        assert_eq!(outcomes.len(), 3);
        let by_period = |p: &str| outcomes.iter().find(|o| o.period == p).unwrap();
        assert!(by_period("2023").passed);
        assert!(!by_period("2024").passed);
        assert!(by_period("2025").passed);
    }

    #[test]
    fn error_table_and_summary_cover_every_finding() {
        let mut collector = FindingCollector::new();
        collector.record(mismatch("Acme", "2024", Severity::Error));
        let report = collector.into_report();

        let table = report.error_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].rule, "hierarchy_rollup");
        assert_eq!(table[0].difference, Some(dec("50.00")));

        let text = report.render_summary();
        assert!(text.contains("1 errors"));
        assert!(text.contains("Acme / 2024: FAIL"));

        // Findings serialize cleanly for export
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("hierarchy_rollup"));
    }
}
