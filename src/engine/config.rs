use chrono::TimeDelta;
use rust_decimal::Decimal;

use crate::engine::errors::ConfigError;

/// Tunable thresholds for the feature stages.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    /// Maximum gap between two transactions on a card that still counts as high velocity.
    pub velocity_window: TimeDelta,
    /// Percentile level (0..=1) an amount must exceed to count as a deviation.
    pub percentile: Decimal,
    /// Amounts strictly below this are candidate card tests.
    pub small_amount_threshold: Decimal,
    /// The next amount must exceed the test amount by more than this multiple.
    pub increase_factor: Decimal
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            velocity_window: TimeDelta::minutes(3),
            percentile: Decimal::new(95, 2),
            small_amount_threshold: Decimal::new(500, 2),
            increase_factor: Decimal::from(8)
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.percentile < Decimal::ZERO || self.percentile > Decimal::ONE {
            return Err(ConfigError::PercentileOutOfRange(self.percentile))
        }

        if self.velocity_window < TimeDelta::zero() {
            return Err(ConfigError::NegativeVelocityWindow(self.velocity_window))
        }

        if self.small_amount_threshold < Decimal::ZERO {
            return Err(ConfigError::NegativeThreshold(self.small_amount_threshold))
        }

        if self.increase_factor < Decimal::ZERO {
            return Err(ConfigError::NegativeIncreaseFactor(self.increase_factor))
        }

        Ok(())
    }
}
