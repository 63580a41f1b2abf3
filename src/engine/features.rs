//! The per-row feature stages.
//!
//! Every stage expects the rows sorted by card number and then timestamp, which
//! makes each card a contiguous run of the slice. Each returns one value per row,
//! index-aligned with the input.

use std::collections::{HashMap, HashSet};

use chrono::TimeDelta;
use rust_decimal::Decimal;

use crate::engine::percentile::percentile;
use crate::models::Transaction;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub gap: Option<TimeDelta>,
    pub is_high: bool
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linkage {
    pub cards_per_device: usize,
    pub devices_per_card: usize
}

fn card_runs(rows: &[Transaction]) -> impl Iterator<Item = &[Transaction]> {
    rows.chunk_by(|left, right| left.card_number == right.card_number)
}

/// Gap to the previous transaction on the same card, flagged when within `window`.
pub fn velocity(rows: &[Transaction], window: TimeDelta) -> Vec<Velocity> {
    let mut result = Vec::with_capacity(rows.len());

    for card in card_runs(rows) {
        let mut previous: Option<Timestamp> = None;

        for transaction in card {
            let gap = previous.map(|earlier| transaction.timestamp - earlier);
            result.push(Velocity {
                gap,
                is_high: gap.is_some_and(|gap| gap <= window)
            });
            previous = Some(transaction.timestamp);
        }
    }

    result
}

/// Distinct cards seen on each row's device and distinct devices seen for each row's card,
/// counted over the whole table.
pub fn linkage(rows: &[Transaction]) -> Vec<Linkage> {
    let mut cards_by_device: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut devices_by_card: HashMap<&str, HashSet<&str>> = HashMap::new();

    for transaction in rows {
        cards_by_device.entry(transaction.device_id.as_str()).or_default().insert(transaction.card_number.as_str());
        devices_by_card.entry(transaction.card_number.as_str()).or_default().insert(transaction.device_id.as_str());
    }

    rows.iter()
        .map(|transaction| Linkage {
            cards_per_device: cards_by_device.get(transaction.device_id.as_str()).map_or(0, HashSet::len),
            devices_per_card: devices_by_card.get(transaction.card_number.as_str()).map_or(0, HashSet::len)
        })
        .collect()
}

/// Flags rows whose amount exceeds the `level` percentile of their group, where groups are
/// formed by `key`. Groups with a single transaction never flag.
pub fn deviation<'a, F>(rows: &'a [Transaction], key: F, level: Decimal) -> Vec<bool>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, transaction) in rows.iter().enumerate() {
        groups.entry(key(transaction)).or_default().push(index);
    }

    let mut flags = vec![false; rows.len()];

    for indices in groups.values() {
        debug_assert!(!indices.is_empty(), "groups are built from existing rows");

        // A lone transaction cannot deviate from its own group.
        if indices.len() < 2 {
            continue;
        }

        let amounts: Vec<Decimal> = indices.iter().map(|&index| rows[index].amount).collect();
        let Some(threshold) = percentile(&amounts, level) else {
            continue;
        };

        for &index in indices {
            flags[index] = rows[index].amount > threshold;
        }
    }

    flags
}

/// Flags a small charge immediately followed, on the same card, by a much larger one.
/// The last transaction of a card has no successor and is never flagged.
pub fn card_testing(rows: &[Transaction], small_amount_threshold: Decimal, increase_factor: Decimal) -> Vec<bool> {
    let mut flags = Vec::with_capacity(rows.len());

    for card in card_runs(rows) {
        for pair in card.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            // A limit beyond the Decimal range cannot be exceeded.
            let exceeds = current.amount.checked_mul(increase_factor).is_some_and(|limit| next.amount > limit);
            flags.push(current.amount < small_amount_threshold && exceeds);
        }

        flags.push(false);
    }

    flags
}
