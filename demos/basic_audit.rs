//! Basic validation run example

use audit_core::{AuditEngine, BalanceRecord, MemoryDataset, VoucherDetailRecord};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn balance(code: &str, name: &str, opening: &str, debit: &str, credit: &str, closing: &str) -> BalanceRecord {
    BalanceRecord {
        company: "Demo Trading Co".to_string(),
        period: "2024".to_string(),
        year: 2024,
        subject_code: code.to_string(),
        subject_name: name.to_string(),
        opening_balance: dec(opening),
        debit_turnover: dec(debit),
        credit_turnover: dec(credit),
        closing_balance: dec(closing),
        dimension_name: None,
        dimension_type: None,
    }
}

fn voucher(no: &str, code: &str, debit: &str, credit: &str) -> VoucherDetailRecord {
    VoucherDetailRecord {
        company: "Demo Trading Co".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        voucher_word: "GJ".to_string(),
        voucher_no: no.to_string(),
        entry_no: 1,
        summary: "demo posting".to_string(),
        subject_code: code.to_string(),
        subject_full_name: name_of(code),
        debit_amount: dec(debit),
        credit_amount: dec(credit),
    }
}

fn name_of(code: &str) -> String {
    match code {
        "1002" => "Bank".to_string(),
        "4001" => "Revenue".to_string(),
        other => other.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Audit Core - Basic Validation Example\n");

    let dataset = MemoryDataset::with_tables(
        vec![
            balance("1002", "Bank", "0.00", "900.00", "0.00", "900.00"),
            balance("3001", "Paid-in capital", "0.00", "0.00", "200.00", "200.00"),
            // Revenue short by 100.00: the equation and the vouchers disagree
            balance("4001", "Revenue", "0.00", "0.00", "600.00", "600.00"),
        ],
        vec![
            voucher("1", "1002", "900.00", "0.00"),
            voucher("2", "4001", "0.00", "700.00"),
        ],
    );

    let engine = AuditEngine::with_defaults(dataset);
    let report = engine.run().await?;

    println!("{}", report.render_summary());

    println!("Error table:");
    for row in report.error_table() {
        println!(
            "  [{}] {} {} subject={} expected={:?} actual={:?}",
            row.rule,
            row.company,
            row.period,
            row.subject_code.as_deref().unwrap_or("-"),
            row.expected,
            row.actual,
        );
    }

    Ok(())
}
