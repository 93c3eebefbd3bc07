//! # Audit Core
//!
//! A validation engine for double-entry accounting data. Given two typed
//! tables - a hierarchical subject balance table and a voucher detail
//! table - it checks that they are internally and mutually consistent and
//! returns a structured list of findings.
//!
//! ## Rules
//!
//! - **Balance integrity**: every row's closing balance equals opening plus
//!   direction-signed period movement
//! - **Accounting equation**: per company and period, assets equal
//!   liabilities plus equity plus net income
//! - **Year continuity**: closing balances carry into the next year's
//!   opening balances
//! - **Hierarchy rollup**: parent subjects equal the aggregation of their
//!   direct children, netting opposite-direction sub-accounts
//! - **Voucher reconciliation**: voucher-line sums agree with the balance
//!   table's turnover
//!
//! Discrepancies are findings, never errors: a run only fails on misshapen
//! input or a failing data source.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use audit_core::{AuditEngine, MemoryDataset};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = MemoryDataset::new(); // or any DatasetSource
//! let engine = AuditEngine::with_defaults(dataset);
//! let report = engine.run().await?;
//! println!("{}", report.render_summary());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod engine;
pub mod hierarchy;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use classifier::SubjectClassifier;
pub use config::{AuditConfig, PrefixRule, RuleToggles, UnknownPolicy};
pub use engine::AuditEngine;
pub use hierarchy::SubjectHierarchy;
pub use report::{
    ErrorRow, FindingCollector, FindingKind, PeriodOutcome, RuleSummary, Severity,
    ValidationFinding, ValidationReport, ValidationRule,
};
pub use traits::DatasetSource;
pub use types::{
    AccountCategory, AuditError, AuditResult, BalanceRecord, BalanceSide, Classification,
    VoucherDetailRecord,
};
pub use utils::MemoryDataset;
