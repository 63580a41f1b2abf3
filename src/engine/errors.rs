use chrono::TimeDelta;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Percentile must be between 0 and 1, got [{0}]")]
    PercentileOutOfRange(Decimal),
    #[error("Velocity window must not be negative, got [{0}]")]
    NegativeVelocityWindow(TimeDelta),
    #[error("Small amount threshold must not be negative, got [{0}]")]
    NegativeThreshold(Decimal),
    #[error("Increase factor must not be negative, got [{0}]")]
    NegativeIncreaseFactor(Decimal)
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid feature configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input row: {0}")]
    Transaction(#[from] TransactionError)
}
