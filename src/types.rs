//! Core types for the validation engine

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Account categories following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Assets - what the business owns (Cash, Inventory, Receivables, etc.)
    Asset,
    /// Liabilities - what the business owes (Loans, Accounts Payable, etc.)
    Liability,
    /// Equity - owner's interest in the business (Capital, Retained Earnings, etc.)
    Equity,
    /// Income/Revenue - money earned by the business
    Income,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountCategory {
    /// Returns the normal balance side for this category.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Income normally carry credit balances.
    pub fn normal_side(&self) -> BalanceSide {
        match self {
            AccountCategory::Asset | AccountCategory::Expense => BalanceSide::Debit,
            AccountCategory::Liability | AccountCategory::Equity | AccountCategory::Income => {
                BalanceSide::Credit
            }
        }
    }
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceSide {
    /// Debit side - increases Assets and Expenses
    Debit,
    /// Credit side - increases Liabilities, Equity, and Income
    Credit,
}

impl BalanceSide {
    /// The opposite side
    pub fn opposite(&self) -> BalanceSide {
        match self {
            BalanceSide::Debit => BalanceSide::Credit,
            BalanceSide::Credit => BalanceSide::Debit,
        }
    }
}

/// Result of classifying a subject code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// The code matched a prefix rule
    Known {
        category: AccountCategory,
        direction: BalanceSide,
    },
    /// No prefix rule matched; dependent checks degrade per policy
    Unknown,
}

impl Classification {
    /// The normal direction, if the code was classified
    pub fn direction(&self) -> Option<BalanceSide> {
        match self {
            Classification::Known { direction, .. } => Some(*direction),
            Classification::Unknown => None,
        }
    }

    /// The category, if the code was classified
    pub fn category(&self) -> Option<AccountCategory> {
        match self {
            Classification::Known { category, .. } => Some(*category),
            Classification::Unknown => None,
        }
    }
}

/// One row of the subject balance table: a (company, subject, period) snapshot.
///
/// `opening_balance` and `closing_balance` are net amounts expressed in the
/// subject's normal direction: a credit-normal subject with `closing_balance`
/// 500 holds a 500 credit-side net. Turnovers are raw per-side totals for the
/// period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Company the row belongs to
    pub company: String,
    /// Period label, e.g. "2024" or "2024-06"
    pub period: String,
    /// Fiscal year of the period
    pub year: i32,
    /// Hierarchical subject code, e.g. "1002.01"
    pub subject_code: String,
    /// Human-readable subject name
    pub subject_name: String,
    /// Net opening balance in the subject's normal direction
    pub opening_balance: BigDecimal,
    /// Total debit movement for the period
    pub debit_turnover: BigDecimal,
    /// Total credit movement for the period
    pub credit_turnover: BigDecimal,
    /// Net closing balance in the subject's normal direction
    pub closing_balance: BigDecimal,
    /// Sub-ledger dimension value (supplier, customer, department, ...)
    pub dimension_name: Option<String>,
    /// Kind of dimension the row is split by
    pub dimension_type: Option<String>,
}

impl BalanceRecord {
    /// Whether this row is a sub-ledger dimension split rather than a
    /// subject-level aggregate. Dimension rows are children-by-attribute,
    /// not children-by-code, and stay out of code-based rollups.
    pub fn is_dimension_row(&self) -> bool {
        self.dimension_name.is_some()
    }

    /// Period movement signed toward the given normal direction:
    /// `debit - credit` for debit-normal subjects, the mirror for
    /// credit-normal ones.
    pub fn signed_turnover(&self, direction: BalanceSide) -> BigDecimal {
        match direction {
            BalanceSide::Debit => &self.debit_turnover - &self.credit_turnover,
            BalanceSide::Credit => &self.credit_turnover - &self.debit_turnover,
        }
    }
}

/// One posting line of a voucher (journal entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherDetailRecord {
    /// Company the line belongs to
    pub company: String,
    /// Posting date
    pub date: NaiveDate,
    /// Voucher word (journal book prefix)
    pub voucher_word: String,
    /// Voucher number within the word/period
    pub voucher_no: String,
    /// Line sequence within the voucher
    pub entry_no: u32,
    /// Free-text line summary
    pub summary: String,
    /// Leaf subject code the line posts to
    pub subject_code: String,
    /// Full subject path name
    pub subject_full_name: String,
    /// Debit amount (zero when the line is a credit)
    pub debit_amount: BigDecimal,
    /// Credit amount (zero when the line is a debit)
    pub credit_amount: BigDecimal,
}

impl VoucherDetailRecord {
    /// Fiscal year the line falls into, taken from the posting date
    pub fn fiscal_year(&self) -> i32 {
        self.date.year()
    }
}

/// Errors that abort a validation run.
///
/// Accounting discrepancies are never errors - they come back as findings.
/// Only broken input shape or a failing data source stops the run.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Dataset source error: {0}")]
    Source(String),
    #[error("Data shape error in {dataset} table: {detail}")]
    DataShape {
        dataset: &'static str,
        detail: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for engine operations
pub type AuditResult<T> = Result<T, AuditError>;
