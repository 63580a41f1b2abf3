use serde::Serialize;

use crate::types::DeviceId;

/// Per-device rollup of transaction volume and chargebacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub device_id: DeviceId,
    pub total_transactions: usize,
    pub chargeback_count: usize,
    pub distinct_cards_used: usize,
    pub chargeback_rate: f64
}
