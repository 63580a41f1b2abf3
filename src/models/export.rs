use crate::models::EnrichedTransaction;

/// Column names appended to the original columns in the enriched export.
pub const FEATURE_COLUMNS: [&str; 7] = [
    "time_diff_minutes",
    "is_high_velocity",
    "distinct_cards_per_device",
    "distinct_devices_per_card",
    "is_high_deviation_from_avg",
    "is_high_deviation_from_merchant_avg",
    "is_card_test_attempt"
];

/// The integer (0/1) view of an enriched row used by downstream consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub has_cbk: u8,
    pub time_diff_minutes: Option<f64>,
    pub is_high_velocity: u8,
    pub distinct_cards_per_device: usize,
    pub distinct_devices_per_card: usize,
    pub is_high_deviation_from_avg: u8,
    pub is_high_deviation_from_merchant_avg: u8,
    pub is_card_test_attempt: u8
}

impl ExportRecord {
    /// Renders the derived columns in `FEATURE_COLUMNS` order.
    pub fn feature_fields(&self) -> Vec<String> {
        vec![
            self.time_diff_minutes.map(|minutes| minutes.to_string()).unwrap_or_default(),
            self.is_high_velocity.to_string(),
            self.distinct_cards_per_device.to_string(),
            self.distinct_devices_per_card.to_string(),
            self.is_high_deviation_from_avg.to_string(),
            self.is_high_deviation_from_merchant_avg.to_string(),
            self.is_card_test_attempt.to_string()
        ]
    }
}

impl From<&EnrichedTransaction> for ExportRecord {
    fn from(row: &EnrichedTransaction) -> Self {
        Self {
            has_cbk: u8::from(row.transaction.chargeback),
            time_diff_minutes: row.time_diff_minutes(),
            is_high_velocity: u8::from(row.is_high_velocity),
            distinct_cards_per_device: row.distinct_cards_per_device,
            distinct_devices_per_card: row.distinct_devices_per_card,
            is_high_deviation_from_avg: u8::from(row.is_high_deviation_from_avg),
            is_high_deviation_from_merchant_avg: u8::from(row.is_high_deviation_from_merchant_avg),
            is_card_test_attempt: u8::from(row.is_card_test_attempt)
        }
    }
}
