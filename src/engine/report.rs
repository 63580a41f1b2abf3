use crate::models::EnrichedTransaction;

type FeatureFlag = fn(&EnrichedTransaction) -> bool;

const REPORTED_FEATURES: [(&str, FeatureFlag); 4] = [
    ("is_high_velocity", |row: &EnrichedTransaction| row.is_high_velocity),
    ("is_high_deviation_from_avg", |row: &EnrichedTransaction| row.is_high_deviation_from_avg),
    ("is_high_deviation_from_merchant_avg", |row: &EnrichedTransaction| row.is_high_deviation_from_merchant_avg),
    ("is_card_test_attempt", |row: &EnrichedTransaction| row.is_card_test_attempt)
];

/// How often a boolean feature fired and how many of those rows were charged back.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStat {
    pub name: &'static str,
    pub flagged: usize,
    pub flagged_chargebacks: usize
}

impl FeatureStat {
    /// Share of flagged rows that were charged back. `None` when nothing was flagged.
    pub fn chargeback_rate(&self) -> Option<f64> {
        (self.flagged > 0).then(|| self.flagged_chargebacks as f64 / self.flagged as f64)
    }
}

/// A quick check of how the derived features line up with the chargeback label.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureReport {
    pub rows: usize,
    pub chargebacks: usize,
    pub features: Vec<FeatureStat>
}

impl FeatureReport {
    pub fn from_rows(rows: &[EnrichedTransaction]) -> Self {
        let features = REPORTED_FEATURES.into_iter()
            .map(|(name, flag)| {
                let flagged_rows = rows.iter().filter(|row| flag(*row));
                let (flagged, flagged_chargebacks) = flagged_rows.fold((0, 0), |(flagged, chargebacks), row| {
                    (flagged + 1, chargebacks + usize::from(row.transaction.chargeback))
                });

                FeatureStat { name, flagged, flagged_chargebacks }
            })
            .collect();

        Self {
            rows: rows.len(),
            chargebacks: rows.iter().filter(|row| row.transaction.chargeback).count(),
            features
        }
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureStat> {
        self.features.iter().find(|stat| stat.name == name)
    }

    /// Share of all rows that were charged back. `None` for an empty table.
    pub fn baseline_chargeback_rate(&self) -> Option<f64> {
        (self.rows > 0).then(|| self.chargebacks as f64 / self.rows as f64)
    }
}
