mod device_summary;
mod enriched;
mod errors;
mod export;
mod transaction;

use csv::StringRecord;

pub use device_summary::DeviceSummary;
pub use enriched::{EnrichedTable, EnrichedTransaction};
pub use errors::TransactionError;
pub use export::{ExportRecord, FEATURE_COLUMNS};
pub use transaction::{validate_all, Transaction};

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "transaction_id",
    "card_number",
    "merchant_id",
    "device_id",
    "transaction_date",
    "transaction_amount",
    "has_cbk"
];

/// The fully materialised input table.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    pub headers: StringRecord,
    pub transactions: Vec<Transaction>
}
