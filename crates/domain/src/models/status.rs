//! Derived chip status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::SignalQuality;

/// Coarse health classification of a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipState {
    Active,
    Inactive,
    LowBattery,
    NoSignal,
    Offline,
}

/// Status computed on every read from the chip, its latest fix and the pet's
/// safe zones. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipStatus {
    pub chip_id: Uuid,
    pub status: ChipState,
    pub last_update: DateTime<Utc>,
    pub battery_level: u8,
    pub signal_strength: SignalQuality,
    pub is_in_safe_zone: bool,
}
