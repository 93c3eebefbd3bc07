//! Integration tests for audit-core

use audit_core::{
    AccountCategory, AuditConfig, AuditEngine, BalanceRecord, FindingKind, MemoryDataset,
    PrefixRule, Severity, ValidationRule, VoucherDetailRecord,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn balance(
    code: &str,
    name: &str,
    year: i32,
    opening: &str,
    debit: &str,
    credit: &str,
    closing: &str,
) -> BalanceRecord {
    BalanceRecord {
        company: "Acme Manufacturing".into(),
        period: year.to_string(),
        year,
        subject_code: code.into(),
        subject_name: name.into(),
        opening_balance: dec(opening),
        debit_turnover: dec(debit),
        credit_turnover: dec(credit),
        closing_balance: dec(closing),
        dimension_name: None,
        dimension_type: None,
    }
}

fn voucher(code: &str, no: &str, debit: &str, credit: &str) -> VoucherDetailRecord {
    VoucherDetailRecord {
        company: "Acme Manufacturing".into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        voucher_word: "GJ".into(),
        voucher_no: no.into(),
        entry_no: 1,
        summary: "posting".into(),
        subject_code: code.into(),
        subject_full_name: code.into(),
        debit_amount: dec(debit),
        credit_amount: dec(credit),
    }
}

/// Two consistent years of books with a hierarchy under 1002, a supplier
/// dimension split on 2202, and vouchers backing every 2024 movement.
fn consistent_books() -> MemoryDataset {
    let mut balances = vec![
        // 2023
        balance("1002", "Bank", 2023, "0.00", "1000.00", "200.00", "800.00"),
        balance("1002.01", "Bank - operating", 2023, "0.00", "600.00", "100.00", "500.00"),
        balance("1002.02", "Bank - reserve", 2023, "0.00", "400.00", "100.00", "300.00"),
        balance("2202", "Accounts payable", 2023, "0.00", "100.00", "400.00", "300.00"),
        balance("3001", "Paid-in capital", 2023, "0.00", "0.00", "500.00", "500.00"),
        balance("4001", "Revenue", 2023, "0.00", "0.00", "0.00", "0.00"),
        balance("5001", "Operating expenses", 2023, "0.00", "0.00", "0.00", "0.00"),
        // 2024
        balance("1002", "Bank", 2024, "800.00", "700.00", "300.00", "1200.00"),
        balance("1002.01", "Bank - operating", 2024, "500.00", "400.00", "100.00", "800.00"),
        balance("1002.02", "Bank - reserve", 2024, "300.00", "300.00", "200.00", "400.00"),
        balance("2202", "Accounts payable", 2024, "300.00", "200.00", "300.00", "400.00"),
        balance("3001", "Paid-in capital", 2024, "500.00", "0.00", "0.00", "500.00"),
        balance("4001", "Revenue", 2024, "0.00", "0.00", "900.00", "900.00"),
        balance("5001", "Operating expenses", 2024, "0.00", "600.00", "0.00", "600.00"),
    ];
    // Sub-ledger split of the 2024 payables row
    let mut supplier = balance("2202", "Accounts payable", 2024, "300.00", "200.00", "300.00", "400.00");
    supplier.dimension_name = Some("Supplier A".into());
    supplier.dimension_type = Some("supplier".into());
    balances.push(supplier);

    let vouchers = vec![
        voucher("1002.01", "1", "400.00", "0.00"),
        voucher("1002.01", "2", "0.00", "100.00"),
        voucher("1002.02", "3", "300.00", "0.00"),
        voucher("1002.02", "4", "0.00", "200.00"),
        voucher("2202", "5", "200.00", "0.00"),
        voucher("2202", "6", "0.00", "300.00"),
        voucher("4001", "7", "0.00", "900.00"),
        voucher("5001", "8", "600.00", "0.00"),
    ];

    MemoryDataset::with_tables(balances, vouchers)
}

#[tokio::test]
async fn consistent_books_produce_zero_findings() {
    let engine = AuditEngine::with_defaults(consistent_books());
    let report = engine.run().await.unwrap();

    assert!(report.all_findings().is_empty(), "{:#?}", report.all_findings());
    assert!(report.passed());

    let summary = report.render_summary();
    assert!(summary.contains("Acme Manufacturing / 2023: PASS"));
    assert!(summary.contains("Acme Manufacturing / 2024: PASS"));
}

#[tokio::test]
async fn broken_year_boundary_yields_one_continuity_finding() {
    let mut dataset = consistent_books();
    // 2025 opens 100 short of the 2024 close
    dataset.push_balance(balance(
        "3001", "Paid-in capital", 2025, "400.00", "0.00", "100.00", "500.00",
    ));
    // Companions so 2025 itself stays internally consistent
    dataset.push_balance(balance("1002", "Bank", 2025, "1200.00", "0.00", "0.00", "1200.00"));
    dataset.push_balance(balance("1002.01", "Bank - operating", 2025, "800.00", "0.00", "0.00", "800.00"));
    dataset.push_balance(balance("1002.02", "Bank - reserve", 2025, "400.00", "0.00", "0.00", "400.00"));
    dataset.push_balance(balance("2202", "Accounts payable", 2025, "400.00", "300.00", "0.00", "100.00"));
    dataset.push_balance(balance("4001", "Revenue", 2025, "0.00", "0.00", "0.00", "0.00"));
    dataset.push_balance(balance("5001", "Operating expenses", 2025, "0.00", "0.00", "0.00", "0.00"));

    let engine = AuditEngine::with_defaults(dataset);
    let report = engine.run().await.unwrap();

    let continuity = report.findings_by_rule(ValidationRule::YearContinuity);
    assert_eq!(continuity.len(), 1);
    assert_eq!(continuity[0].subject_code.as_deref(), Some("3001"));
    assert_eq!(continuity[0].expected, Some(dec("500.00")));
    assert_eq!(continuity[0].actual, Some(dec("400.00")));
    assert_eq!(
        continuity[0].difference.as_ref().map(|d| d.abs()),
        Some(dec("100.00"))
    );
}

#[tokio::test]
async fn extra_voucher_credit_yields_one_reconciliation_finding() {
    let mut dataset = consistent_books();
    // A 10.00 credit posted to vouchers but never carried into the balance table
    dataset.push_voucher(voucher("2202", "99", "0.00", "10.00"));

    let engine = AuditEngine::with_defaults(dataset);
    let report = engine.run().await.unwrap();

    let reconciliation = report.findings_by_rule(ValidationRule::VoucherReconciliation);
    assert_eq!(reconciliation.len(), 1);
    assert_eq!(reconciliation[0].kind, FindingKind::NumericMismatch);
    assert_eq!(reconciliation[0].subject_code.as_deref(), Some("2202"));
    assert_eq!(reconciliation[0].difference, Some(dec("10.00")));
}

#[tokio::test]
async fn perturbed_child_yields_parent_discrepancy_of_fifty() {
    let dataset = MemoryDataset::with_tables(
        vec![
            balance("1002", "Bank", 2024, "800.00", "700.00", "300.00", "1200.00"),
            balance("1002.01", "Bank - operating", 2024, "500.00", "400.00", "100.00", "800.00"),
            // 50.00 more movement than the parent accounts for
            balance("1002.02", "Bank - reserve", 2024, "300.00", "350.00", "200.00", "450.00"),
        ],
        Vec::new(),
    );
    let engine = AuditEngine::with_defaults(dataset);
    let report = engine.run().await.unwrap();

    let rollups = report.findings_by_rule(ValidationRule::HierarchyRollup);
    assert_eq!(rollups.len(), 2, "turnover and closing both off by 50");
    for finding in &rollups {
        assert_eq!(finding.subject_code.as_deref(), Some("1002"));
        assert_eq!(finding.difference.as_ref().map(|d| d.abs()), Some(dec("50.00")));
    }
}

#[tokio::test]
async fn mixed_direction_children_are_netted_not_summed() {
    // 2202.01 holds prepayments to suppliers, reclassified debit-normal
    let mut config = AuditConfig::default();
    config
        .prefix_rules
        .push(PrefixRule::new("2202.01", AccountCategory::Asset));

    let netted = MemoryDataset::with_tables(
        vec![
            balance("2202", "Accounts payable", 2024, "0.00", "300.00", "500.00", "200.00"),
            balance("2202.01", "Prepayments", 2024, "0.00", "300.00", "0.00", "300.00"),
            balance("2202.02", "Trade payables", 2024, "0.00", "0.00", "500.00", "500.00"),
        ],
        Vec::new(),
    );
    let report = AuditEngine::new(netted, config.clone()).run().await.unwrap();
    assert!(
        report.findings_by_rule(ValidationRule::HierarchyRollup).is_empty(),
        "net 500 - 300 = 200 must reconcile"
    );

    // A parent carrying the naive 800 sum must be flagged
    let naive = MemoryDataset::with_tables(
        vec![
            balance("2202", "Accounts payable", 2024, "0.00", "300.00", "1100.00", "800.00"),
            balance("2202.01", "Prepayments", 2024, "0.00", "300.00", "0.00", "300.00"),
            balance("2202.02", "Trade payables", 2024, "0.00", "0.00", "500.00", "500.00"),
        ],
        Vec::new(),
    );
    let report = AuditEngine::new(naive, config).run().await.unwrap();
    assert!(!report.findings_by_rule(ValidationRule::HierarchyRollup).is_empty());
}

#[tokio::test]
async fn two_runs_are_byte_identical() {
    let mut dataset = consistent_books();
    // Seed a few findings of different rules and severities
    dataset.push_balance(balance("9001", "Mystery", 2024, "0.00", "5.00", "0.00", "99.00"));
    dataset.push_voucher(voucher("2202", "99", "0.00", "10.00"));

    let engine = AuditEngine::with_defaults(dataset);
    let first = engine.run().await.unwrap();
    let second = engine.run().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.error_table()).unwrap(),
        serde_json::to_string(&second.error_table()).unwrap()
    );
}

#[tokio::test]
async fn error_table_carries_full_scope_and_amounts() {
    let mut dataset = consistent_books();
    dataset.push_voucher(voucher("2202", "99", "0.00", "10.00"));

    let engine = AuditEngine::with_defaults(dataset);
    let report = engine.run().await.unwrap();

    let table = report.error_table();
    assert_eq!(table.len(), 1);
    let row = &table[0];
    assert_eq!(row.rule, "voucher_reconciliation");
    assert_eq!(row.severity, Severity::Error);
    assert_eq!(row.company, "Acme Manufacturing");
    assert_eq!(row.period, "2024");
    assert_eq!(row.subject_code.as_deref(), Some("2202"));
    assert_eq!(row.expected, Some(dec("300.00")));
    assert_eq!(row.actual, Some(dec("310.00")));
    assert_eq!(row.difference, Some(dec("10.00")));

    let summary = report.render_summary();
    assert!(summary.contains("Acme Manufacturing / 2024: FAIL"));
    assert!(summary.contains("Acme Manufacturing / 2023: PASS"));
}
