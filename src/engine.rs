//! Run orchestration

use log::{debug, info};

use crate::classifier::SubjectClassifier;
use crate::config::AuditConfig;
use crate::report::{FindingCollector, ValidationReport, ValidationRule};
use crate::traits::DatasetSource;
use crate::types::{AuditResult, BalanceRecord, VoucherDetailRecord};
use crate::utils::shape;
use crate::validators::{
    check_accounting_equation, check_balance_integrity, check_hierarchy_rollup,
    check_voucher_reconciliation, check_year_continuity, ValidationContext,
};

/// Drives a validation run over a [`DatasetSource`].
///
/// A run is one deterministic pass: fetch, shape-check, execute the enabled
/// rules in fixed order, merge their finding buffers. Identical inputs
/// produce identical reports, order and content.
pub struct AuditEngine<S: DatasetSource> {
    source: S,
    config: AuditConfig,
}

impl<S: DatasetSource> AuditEngine<S> {
    /// Create an engine with an explicit configuration
    pub fn new(source: S, config: AuditConfig) -> Self {
        Self { source, config }
    }

    /// Create an engine with the default configuration
    pub fn with_defaults(source: S) -> Self {
        Self::new(source, AuditConfig::default())
    }

    /// The configuration in force
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Execute one validation run.
    ///
    /// Fails only on a broken source or misshapen input (nothing downstream
    /// can be trusted then); every accounting discrepancy comes back inside
    /// the report.
    pub async fn run(&self) -> AuditResult<ValidationReport> {
        let balances = self.source.balance_records().await?;
        let vouchers = self.source.voucher_records().await?;
        info!(
            "validation run starting: {} balance rows, {} voucher lines",
            balances.len(),
            vouchers.len()
        );

        shape::check_balance_shape(&balances)?;
        shape::check_voucher_shape(&vouchers)?;

        Ok(self.validate(&balances, &vouchers))
    }

    fn validate(
        &self,
        balances: &[BalanceRecord],
        vouchers: &[VoucherDetailRecord],
    ) -> ValidationReport {
        let classifier = SubjectClassifier::new(&self.config.prefix_rules);
        let ctx = ValidationContext {
            config: &self.config,
            classifier: &classifier,
        };

        let mut merged = FindingCollector::new();
        for row in balances {
            merged.note_scope(&row.company, &row.period);
        }

        // Each rule fills its own buffer over the shared read-only slices;
        // buffers merge in rule order.
        let mut run_phase =
            |rule: ValidationRule, enabled: bool, phase: &dyn Fn(&mut FindingCollector)| {
                if !enabled {
                    debug!("{} disabled, skipping", rule.name());
                    return;
                }
                let mut buffer = FindingCollector::new();
                phase(&mut buffer);
                merged.merge(buffer);
                debug!("{} finished", rule.name());
            };

        run_phase(
            ValidationRule::BalanceIntegrity,
            self.config.rules.balance_integrity,
            &|out| check_balance_integrity(&ctx, balances, out),
        );
        run_phase(
            ValidationRule::AccountingEquation,
            self.config.rules.accounting_equation,
            &|out| check_accounting_equation(&ctx, balances, out),
        );
        run_phase(
            ValidationRule::YearContinuity,
            self.config.rules.year_continuity,
            &|out| check_year_continuity(&ctx, balances, out),
        );
        run_phase(
            ValidationRule::HierarchyRollup,
            self.config.rules.hierarchy_rollup,
            &|out| check_hierarchy_rollup(&ctx, balances, out),
        );
        run_phase(
            ValidationRule::VoucherReconciliation,
            self.config.rules.voucher_reconciliation,
            &|out| check_voucher_reconciliation(&ctx, balances, vouchers, out),
        );

        let report = merged.into_report();
        info!(
            "validation run finished: {} findings ({} errors, {} warnings)",
            report.all_findings().len(),
            report.error_count(),
            report.warning_count()
        );
        report
    }
}
