use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::models::{DeviceSummary, EnrichedTable, ExportRecord, Transaction, TransactionTable, FEATURE_COLUMNS, REQUIRED_COLUMNS};
use crate::storage::errors::StorageError;
use crate::storage::Storage;

const CHARGEBACK_COLUMN: &str = "has_cbk";
const SUMMARY_COLUMNS: [&str; 5] = [
    "device_id",
    "total_transactions",
    "chargeback_count",
    "distinct_cards_used",
    "chargeback_rate"
];

/// CSV backed storage: one input file, two output files.
///
/// Outputs are staged as temporary files next to their destinations and only
/// renamed into place once both have been written in full.
pub struct CsvStorage {
    input: PathBuf,
    enriched_output: PathBuf,
    summary_output: PathBuf
}

impl CsvStorage {
    pub fn new(input: impl Into<PathBuf>, enriched_output: impl Into<PathBuf>, summary_output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            enriched_output: enriched_output.into(),
            summary_output: summary_output.into()
        }
    }

    fn stage_enriched(&self, table: &EnrichedTable) -> Result<NamedTempFile, StorageError> {
        let path = &self.enriched_output;
        let mut staged = staging_file(path)?;
        let chargeback_index = table.headers.iter().position(|header| header == CHARGEBACK_COLUMN);

        {
            let mut writer = WriterBuilder::new().from_writer(staged.as_file_mut());
            let encode = |source: csv::Error| StorageError::Encode { path: path.clone(), source };

            let mut header: Vec<&str> = table.headers.iter().collect();
            header.extend(FEATURE_COLUMNS);
            writer.write_record(&header).map_err(encode)?;

            for row in &table.rows {
                let export = ExportRecord::from(row);
                let mut fields: Vec<String> = row.transaction.record.iter()
                    .enumerate()
                    .map(|(index, value)| {
                        if Some(index) == chargeback_index {
                            export.has_cbk.to_string()
                        } else {
                            value.to_string()
                        }
                    })
                    .collect();

                fields.extend(export.feature_fields());
                writer.write_record(&fields).map_err(encode)?;
            }

            writer.flush().map_err(|source| StorageError::Write { path: path.clone(), source })?;
        }

        staged.as_file().sync_all().map_err(|source| StorageError::Write { path: path.clone(), source })?;

        Ok(staged)
    }

    fn stage_summary(&self, summaries: &[DeviceSummary]) -> Result<NamedTempFile, StorageError> {
        let path = &self.summary_output;
        let mut staged = staging_file(path)?;

        {
            let mut writer = WriterBuilder::new().from_writer(staged.as_file_mut());
            let encode = |source: csv::Error| StorageError::Encode { path: path.clone(), source };

            if summaries.is_empty() {
                writer.write_record(SUMMARY_COLUMNS).map_err(encode)?;
            }

            for summary in summaries {
                writer.serialize(summary).map_err(encode)?;
            }

            writer.flush().map_err(|source| StorageError::Write { path: path.clone(), source })?;
        }

        staged.as_file().sync_all().map_err(|source| StorageError::Write { path: path.clone(), source })?;

        Ok(staged)
    }
}

impl Storage for CsvStorage {
    fn load(&self) -> Result<TransactionTable, StorageError> {
        let path = &self.input;
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|source| StorageError::Open { path: path.clone(), source })?;

        let headers = reader.headers()
            .map_err(|source| StorageError::invalid_record(path, source))?
            .clone();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(StorageError::MissingColumn { path: path.clone(), column });
            }
        }

        let mut transactions = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|source| StorageError::invalid_record(path, source))?;
            let line = record.position().map_or(0, |position| position.line());

            let mut transaction: Transaction = record.deserialize(Some(&headers))
                .map_err(|source| StorageError::InvalidRecord { path: path.clone(), line, source })?;

            transaction.line = line;
            transaction.record = record;
            transactions.push(transaction);
        }

        debug!("Read {} rows from {}", transactions.len(), path.display());

        Ok(TransactionTable { headers, transactions })
    }

    fn save(&self, table: &EnrichedTable, summaries: &[DeviceSummary]) -> Result<(), StorageError> {
        let enriched = self.stage_enriched(table)?;
        let summary = self.stage_summary(summaries)?;

        persist(enriched, &self.enriched_output)?;
        persist(summary, &self.summary_output)?;

        debug!("Wrote {} and {}", self.enriched_output.display(), self.summary_output.display());

        Ok(())
    }
}

fn staging_file(destination: &Path) -> Result<NamedTempFile, StorageError> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new(".")
    };

    NamedTempFile::new_in(directory)
        .map_err(|source| StorageError::Write { path: destination.to_path_buf(), source })
}

fn persist(staged: NamedTempFile, destination: &Path) -> Result<(), StorageError> {
    staged.persist(destination)
        .map(|_| ())
        .map_err(|error| StorageError::Persist { path: destination.to_path_buf(), source: error.error })
}
