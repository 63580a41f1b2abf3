use std::collections::HashSet;

use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

use crate::models::errors::TransactionError;
use crate::types::{CardNumber, DeviceId, MerchantId, Timestamp, TransactionId};

/// Represents a single row from the input CSV file.
///
/// Only the columns the feature engine interprets are typed here. The raw record
/// is retained alongside so every original column can be written back out.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    /// Globally unique transaction ID, kept as text.
    pub transaction_id: TransactionId,
    /// The card the transaction was made with.
    pub card_number: CardNumber,
    /// The merchant receiving the payment.
    pub merchant_id: MerchantId,
    /// The device the transaction originated from.
    pub device_id: DeviceId,
    /// When the transaction happened.
    #[serde(rename = "transaction_date")]
    pub timestamp: Timestamp,
    /// The amount charged. Never negative for a valid row.
    #[serde(rename = "transaction_amount")]
    pub amount: Decimal,
    /// Whether the transaction was later charged back.
    #[serde(rename = "has_cbk", deserialize_with = "deserialize_flag")]
    pub chargeback: bool,
    /// 1-based line of the row in its source file.
    #[serde(skip)]
    pub line: u64,
    /// The row exactly as it was read.
    #[serde(skip)]
    pub record: StringRecord
}

impl Transaction {
    /// Checks the row-level invariants that serde cannot express on its own.
    ///
    /// # Errors
    /// Returns `TransactionError` if the ID or a grouping key is empty or the amount is negative.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.transaction_id.is_empty() {
            return Err(TransactionError::missing_key(self, "transaction_id"))
        }

        if self.card_number.is_empty() {
            return Err(TransactionError::missing_key(self, "card_number"))
        }

        if self.merchant_id.is_empty() {
            return Err(TransactionError::missing_key(self, "merchant_id"))
        }

        if self.device_id.is_empty() {
            return Err(TransactionError::missing_key(self, "device_id"))
        }

        if self.amount < Decimal::ZERO {
            return Err(TransactionError::negative_amount(self))
        }

        Ok(())
    }
}

/// Validates every row and enforces transaction ID uniqueness across the table.
pub fn validate_all(transactions: &[Transaction]) -> Result<(), TransactionError> {
    let mut seen = HashSet::with_capacity(transactions.len());

    for transaction in transactions {
        transaction.validate()?;

        if !seen.insert(transaction.transaction_id.as_str()) {
            return Err(TransactionError::duplicate_transaction(transaction))
        }
    }

    Ok(())
}

/// Parses the boolean-like encodings found in chargeback exports.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_flag(&value).ok_or_else(|| de::Error::custom(format!("Invalid boolean value '{value}' for has_cbk")))
}
