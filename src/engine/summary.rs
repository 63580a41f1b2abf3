use std::collections::{BTreeMap, HashSet};

use crate::models::{DeviceSummary, EnrichedTransaction};

#[derive(Default)]
struct DeviceTally<'a> {
    total_transactions: usize,
    chargeback_count: usize,
    cards: HashSet<&'a str>
}

/// Rolls the enriched rows up per device, most chargebacks first.
///
/// Devices with equal chargeback counts stay in ascending `device_id` order.
pub fn summarize_devices(rows: &[EnrichedTransaction]) -> Vec<DeviceSummary> {
    let mut tallies: BTreeMap<&str, DeviceTally> = BTreeMap::new();

    for row in rows {
        let transaction = &row.transaction;
        let tally = tallies.entry(transaction.device_id.as_str()).or_default();

        tally.total_transactions += 1;
        tally.chargeback_count += usize::from(transaction.chargeback);
        tally.cards.insert(transaction.card_number.as_str());
    }

    let mut summaries: Vec<DeviceSummary> = tallies.into_iter()
        .map(|(device_id, tally)| DeviceSummary {
            device_id: device_id.to_string(),
            total_transactions: tally.total_transactions,
            chargeback_count: tally.chargeback_count,
            distinct_cards_used: tally.cards.len(),
            chargeback_rate: tally.chargeback_count as f64 / tally.total_transactions as f64
        })
        .collect();

    summaries.sort_by(|left, right| right.chargeback_count.cmp(&left.chargeback_count));

    summaries
}
