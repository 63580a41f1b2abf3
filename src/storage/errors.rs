use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unable to open input [{}]: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: csv::Error
    },
    #[error("Input [{}] is missing required column [{column}]", .path.display())]
    MissingColumn {
        path: PathBuf,
        column: &'static str
    },
    #[error("Invalid record in [{}] on line [{line}]: {source}", .path.display())]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        source: csv::Error
    },
    #[error("Unable to write output [{}]: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error
    },
    #[error("Unable to encode output [{}]: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: csv::Error
    },
    #[error("Unable to move output into place at [{}]: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: io::Error
    }
}

impl StorageError {
    pub fn invalid_record(path: &Path, source: csv::Error) -> Self {
        Self::InvalidRecord {
            path: path.to_path_buf(),
            line: source.position().map_or(0, |position| position.line()),
            source
        }
    }
}
