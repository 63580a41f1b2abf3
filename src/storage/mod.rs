mod csv_storage;
mod errors;

use crate::models::{DeviceSummary, EnrichedTable, TransactionTable};

pub use csv_storage::CsvStorage;
pub use errors::StorageError;

/// Where the engine reads its input table from and writes its two output tables to.
pub trait Storage {
    fn load(&self) -> Result<TransactionTable, StorageError>;

    /// Writes both outputs. Either both are written or neither is.
    fn save(&self, table: &EnrichedTable, summaries: &[DeviceSummary]) -> Result<(), StorageError>;
}
