//! In-memory dataset source for tests and small runs

use async_trait::async_trait;

use crate::traits::DatasetSource;
use crate::types::{AuditResult, BalanceRecord, VoucherDetailRecord};

/// A [`DatasetSource`] backed by plain vectors. Useful for tests and for
/// callers that already loaded both tables elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    balances: Vec<BalanceRecord>,
    vouchers: Vec<VoucherDetailRecord>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pre-loaded tables
    pub fn with_tables(
        balances: Vec<BalanceRecord>,
        vouchers: Vec<VoucherDetailRecord>,
    ) -> Self {
        Self { balances, vouchers }
    }

    /// Append a balance row
    pub fn push_balance(&mut self, record: BalanceRecord) {
        self.balances.push(record);
    }

    /// Append a voucher line
    pub fn push_voucher(&mut self, record: VoucherDetailRecord) {
        self.vouchers.push(record);
    }
}

#[async_trait]
impl DatasetSource for MemoryDataset {
    async fn balance_records(&self) -> AuditResult<Vec<BalanceRecord>> {
        Ok(self.balances.clone())
    }

    async fn voucher_records(&self) -> AuditResult<Vec<VoucherDetailRecord>> {
        Ok(self.vouchers.clone())
    }
}
