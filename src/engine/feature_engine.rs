use chrono::TimeDelta;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::engine::config::FeatureConfig;
use crate::engine::errors::EngineError;
use crate::engine::features;
use crate::engine::report::FeatureReport;
use crate::engine::summary::summarize_devices;
use crate::models::{validate_all, DeviceSummary, EnrichedTable, EnrichedTransaction, TransactionTable};
use crate::storage::Storage;

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: EnrichedTable,
    pub summaries: Vec<DeviceSummary>,
    pub report: FeatureReport
}

/// Batch fraud feature engine.
///
/// Derives velocity, linkage, deviation and card testing indicators for a fully
/// loaded transaction table. All stages run synchronously over one sorted snapshot.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    config: FeatureConfig
}

impl FeatureEngine {
    /// Creates an engine with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity_window(mut self, window: TimeDelta) -> Self {
        self.config.velocity_window = window;
        self
    }

    pub fn with_percentile(mut self, percentile: Decimal) -> Self {
        self.config.percentile = percentile;
        self
    }

    pub fn with_small_amount_threshold(mut self, threshold: Decimal) -> Self {
        self.config.small_amount_threshold = threshold;
        self
    }

    pub fn with_increase_factor(mut self, factor: Decimal) -> Self {
        self.config.increase_factor = factor;
        self
    }

    /// Loads the input, enriches it, and saves the enriched table and device summary.
    ///
    /// Nothing is saved unless every stage succeeded.
    pub fn run<S: Storage>(&self, storage: &S) -> anyhow::Result<RunOutput> {
        let table = storage.load()?;
        info!("Loaded {} transactions", table.transactions.len());

        let enriched = self.enrich(table)?;
        let summaries = summarize_devices(&enriched.rows);
        let report = FeatureReport::from_rows(&enriched.rows);
        debug!("Summarised {} devices", summaries.len());

        storage.save(&enriched, &summaries)?;
        info!("Saved {} enriched transactions and {} device summaries", enriched.rows.len(), summaries.len());

        Ok(RunOutput { table: enriched, summaries, report })
    }

    /// Validates, sorts and enriches the table.
    ///
    /// The output holds one row per input row, ordered by card number and then
    /// timestamp. Rows sharing both keep their input order.
    ///
    /// # Errors
    /// Returns `EngineError` if the configuration is invalid or any row violates
    /// the transaction invariants (empty key, negative amount, duplicate ID).
    pub fn enrich(&self, table: TransactionTable) -> Result<EnrichedTable, EngineError> {
        self.config.validate()?;

        let TransactionTable { headers, mut transactions } = table;
        validate_all(&transactions)?;

        transactions.sort_by(|left, right| {
            left.card_number.cmp(&right.card_number).then(left.timestamp.cmp(&right.timestamp))
        });

        let velocity = features::velocity(&transactions, self.config.velocity_window);
        let linkage = features::linkage(&transactions);
        let card_deviation = features::deviation(&transactions, |tx| tx.card_number.as_str(), self.config.percentile);
        let merchant_deviation = features::deviation(&transactions, |tx| tx.merchant_id.as_str(), self.config.percentile);
        let card_tests = features::card_testing(
            &transactions,
            self.config.small_amount_threshold,
            self.config.increase_factor
        );

        debug!(
            "Flagged {} high velocity, {} card deviation, {} merchant deviation, {} card test rows",
            velocity.iter().filter(|velocity| velocity.is_high).count(),
            card_deviation.iter().filter(|flag| **flag).count(),
            merchant_deviation.iter().filter(|flag| **flag).count(),
            card_tests.iter().filter(|flag| **flag).count()
        );

        let rows = transactions.into_iter()
            .enumerate()
            .map(|(index, transaction)| EnrichedTransaction {
                transaction,
                time_since_previous: velocity[index].gap,
                is_high_velocity: velocity[index].is_high,
                distinct_cards_per_device: linkage[index].cards_per_device,
                distinct_devices_per_card: linkage[index].devices_per_card,
                is_high_deviation_from_avg: card_deviation[index],
                is_high_deviation_from_merchant_avg: merchant_deviation[index],
                is_card_test_attempt: card_tests[index]
            })
            .collect();

        Ok(EnrichedTable { headers, rows })
    }
}
