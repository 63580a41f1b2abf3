use chrono::TimeDelta;
use csv::StringRecord;

use crate::models::Transaction;

/// A transaction together with every fraud indicator derived for it.
#[derive(Debug, Clone)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    /// Gap since the previous transaction on the same card. `None` for a card's first transaction.
    pub time_since_previous: Option<TimeDelta>,
    pub is_high_velocity: bool,
    pub distinct_cards_per_device: usize,
    pub distinct_devices_per_card: usize,
    pub is_high_deviation_from_avg: bool,
    pub is_high_deviation_from_merchant_avg: bool,
    pub is_card_test_attempt: bool
}

impl EnrichedTransaction {
    /// The gap to the previous transaction on the card, in fractional minutes.
    pub fn time_diff_minutes(&self) -> Option<f64> {
        self.time_since_previous.map(|gap| match gap.num_microseconds() {
            Some(micros) => micros as f64 / 60_000_000.0,
            None => gap.num_milliseconds() as f64 / 60_000.0
        })
    }
}

/// The enriched rows plus the header of the table they were read from.
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    pub headers: StringRecord,
    pub rows: Vec<EnrichedTransaction>
}
