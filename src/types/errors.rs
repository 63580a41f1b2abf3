use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("Timestamp error: Value is an empty string")]
    Empty,
    #[error("Timestamp error: Unrecognised date/time format '{0}'")]
    InvalidFormat(String)
}
