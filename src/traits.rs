//! The loader seam
//!
//! The engine never parses CSV or handles encodings; a collaborating loader
//! implements [`DatasetSource`] and hands over two already-typed tables.

use async_trait::async_trait;

use crate::types::{AuditResult, BalanceRecord, VoucherDetailRecord};

/// Provider of the two datasets a validation run consumes.
///
/// Implementations may read files, query a database, or serve from memory;
/// the engine only awaits these two calls and treats the results as
/// immutable for the rest of the run.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// The subject balance table
    async fn balance_records(&self) -> AuditResult<Vec<BalanceRecord>>;

    /// The voucher detail table
    async fn voucher_records(&self) -> AuditResult<Vec<VoucherDetailRecord>>;
}
