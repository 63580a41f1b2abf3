use crate::models::Transaction;
use crate::types::TransactionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Column [{column}] is empty for transaction [{transaction_id}] on line [{line}]")]
    MissingKey {
        column: &'static str,
        transaction_id: TransactionId,
        line: u64
    },
    #[error("Amount must not be negative for transaction [{transaction_id}] on line [{line}]")]
    NegativeAmount {
        transaction_id: TransactionId,
        line: u64
    },
    #[error("Duplicate transaction [{transaction_id}] on line [{line}]")]
    DuplicateTransaction {
        transaction_id: TransactionId,
        line: u64
    }
}

impl TransactionError {
    pub fn missing_key(tx: &Transaction, column: &'static str) -> Self {
        Self::MissingKey {
            column,
            transaction_id: tx.transaction_id.clone(),
            line: tx.line
        }
    }

    pub fn negative_amount(tx: &Transaction) -> Self {
        Self::NegativeAmount {
            transaction_id: tx.transaction_id.clone(),
            line: tx.line
        }
    }

    pub fn duplicate_transaction(tx: &Transaction) -> Self {
        Self::DuplicateTransaction {
            transaction_id: tx.transaction_id.clone(),
            line: tx.line
        }
    }
}
