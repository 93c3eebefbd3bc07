//! Hierarchy rollup and netting example

use audit_core::{
    AccountCategory, AuditConfig, AuditEngine, BalanceRecord, MemoryDataset, PrefixRule,
};
use bigdecimal::BigDecimal;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn balance(code: &str, name: &str, closing: &str) -> BalanceRecord {
    BalanceRecord {
        company: "Demo Trading Co".to_string(),
        period: "2024".to_string(),
        year: 2024,
        subject_code: code.to_string(),
        subject_name: name.to_string(),
        opening_balance: dec(closing),
        debit_turnover: dec("0.00"),
        credit_turnover: dec("0.00"),
        closing_balance: dec(closing),
        dimension_name: None,
        dimension_type: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Audit Core - Hierarchy Netting Example\n");

    // Prepayments kept under the payables range carry a debit-normal
    // balance; the parent holds the netted 500 - 300 = 200, not 800.
    let mut config = AuditConfig::default();
    config
        .prefix_rules
        .push(PrefixRule::new("2202.01", AccountCategory::Asset));

    let dataset = MemoryDataset::with_tables(
        vec![
            balance("2202", "Accounts payable", "200.00"),
            balance("2202.01", "Supplier prepayments", "300.00"),
            balance("2202.02", "Trade payables", "500.00"),
            // Offsetting equity so the books as a whole balance
            balance("3001", "Paid-in capital", "-200.00"),
        ],
        Vec::new(),
    );

    let report = AuditEngine::new(dataset, config).run().await?;
    println!("{}", report.render_summary());
    Ok(())
}
