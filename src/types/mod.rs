mod errors;
mod timestamp;

pub use errors::TimestampError;
pub use timestamp::Timestamp;

pub type TransactionId = String;
pub type CardNumber = String;
pub type MerchantId = String;
pub type DeviceId = String;
