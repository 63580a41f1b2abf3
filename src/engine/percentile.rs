use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Computes the `level` percentile of `values` by linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice. `level` is expected to lie within `0..=1`.
pub fn percentile(values: &[Decimal], level: Decimal) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let last = sorted.len() - 1;
    let rank = level * Decimal::from(last as u64);
    let lower = rank.floor();
    let index = lower.to_usize()?.min(last);
    let upper = (index + 1).min(last);
    let fraction = rank - lower;

    Some(sorted[index] + (sorted[upper] - sorted[index]) * fraction)
}
