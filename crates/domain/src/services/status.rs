//! Chip status derivation.

use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::models::chip::chip_for_pet;
use crate::models::{ChipState, ChipStatus, SignalQuality};
use crate::store::TrackingStore;

/// Battery percentage below which a recently seen chip reports `low_battery`.
pub const STATUS_LOW_BATTERY_BELOW: u8 = 20;

/// Fixes younger than this are "live".
pub fn live_window() -> Duration {
    Duration::minutes(10)
}

/// Fixes at least this old mean the chip has lost signal.
pub fn no_signal_after() -> Duration {
    Duration::minutes(60)
}

/// Classifies a chip from the age and battery of its latest fix.
pub fn classify(age: Duration, battery_percent: u8) -> ChipState {
    if age < live_window() {
        if battery_percent < STATUS_LOW_BATTERY_BELOW {
            ChipState::LowBattery
        } else {
            ChipState::Active
        }
    } else if age < no_signal_after() {
        ChipState::Inactive
    } else {
        ChipState::NoSignal
    }
}

/// Derives [`ChipStatus`] from stored chips, locations and zones.
#[derive(Clone)]
pub struct StatusAggregator {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
}

impl StatusAggregator {
    pub fn new(store: Arc<dyn TrackingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Status of the pet's chip, or `None` when the pet has no chip.
    pub async fn chip_status(&self, pet_id: &str) -> Option<ChipStatus> {
        let chips = self.store.chips().await;
        let chip = chip_for_pet(&chips, pet_id)?;

        let location = self
            .store
            .locations()
            .await
            .into_iter()
            .find(|l| l.pet_id == pet_id);

        let Some(location) = location else {
            return Some(ChipStatus {
                chip_id: chip.id,
                status: ChipState::Offline,
                last_update: chip.last_seen.unwrap_or(chip.registered_at),
                battery_level: 0,
                signal_strength: SignalQuality::None,
                is_in_safe_zone: false,
            });
        };

        let fix = &location.fix;
        let age = self.clock.now() - fix.timestamp;
        let point = fix.coordinate();

        // Read-time check; independent of the evaluator's persisted flags.
        let is_in_safe_zone = self
            .store
            .safe_zones()
            .await
            .iter()
            .filter(|z| z.pet_id == pet_id && z.is_active)
            .any(|z| z.contains(&point));

        Some(ChipStatus {
            chip_id: chip.id,
            status: classify(age, fix.battery_percent),
            last_update: fix.timestamp,
            battery_level: fix.battery_percent,
            signal_strength: fix.signal_quality,
            is_in_safe_zone,
        })
    }
}
