//! Storage port for the tracking engine.
//!
//! Every collection is read and written whole: callers load the current
//! collection, mutate it in memory and save it back. Reads never fail; an
//! implementation that cannot read or decode a collection returns it empty.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{Alert, ChipRecord, PetLocation, SafeZone, ZoneMembership};

/// Typed key-value collections backing the tracking engine.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn chips(&self) -> Vec<ChipRecord>;
    async fn save_chips(&self, chips: &[ChipRecord]) -> Result<(), StoreError>;

    async fn locations(&self) -> Vec<PetLocation>;
    async fn save_locations(&self, locations: &[PetLocation]) -> Result<(), StoreError>;

    async fn safe_zones(&self) -> Vec<SafeZone>;
    async fn save_safe_zones(&self, zones: &[SafeZone]) -> Result<(), StoreError>;

    async fn alerts(&self) -> Vec<Alert>;
    async fn save_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError>;

    async fn zone_memberships(&self) -> Vec<ZoneMembership>;
    async fn save_zone_memberships(
        &self,
        memberships: &[ZoneMembership],
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Collections {
    chips: Vec<ChipRecord>,
    locations: Vec<PetLocation>,
    safe_zones: Vec<SafeZone>,
    alerts: Vec<Alert>,
    memberships: Vec<ZoneMembership>,
}

/// In-process store for development and testing.
///
/// Can be told to fail every write, which exercises the error path of the
/// services without a real storage backend.
#[derive(Debug, Default)]
pub struct InMemoryTrackingStore {
    collections: Mutex<Collections>,
    fail_writes: std::sync::atomic::AtomicBool,
}

impl InMemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail (or succeed again with `false`).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    fn check_writable(&self, collection: &'static str) -> Result<(), StoreError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            Err(StoreError::Write {
                collection,
                message: "writes disabled".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TrackingStore for InMemoryTrackingStore {
    async fn chips(&self) -> Vec<ChipRecord> {
        self.collections.lock().await.chips.clone()
    }

    async fn save_chips(&self, chips: &[ChipRecord]) -> Result<(), StoreError> {
        self.check_writable("pet_chips")?;
        self.collections.lock().await.chips = chips.to_vec();
        Ok(())
    }

    async fn locations(&self) -> Vec<PetLocation> {
        self.collections.lock().await.locations.clone()
    }

    async fn save_locations(&self, locations: &[PetLocation]) -> Result<(), StoreError> {
        self.check_writable("pet_locations")?;
        self.collections.lock().await.locations = locations.to_vec();
        Ok(())
    }

    async fn safe_zones(&self) -> Vec<SafeZone> {
        self.collections.lock().await.safe_zones.clone()
    }

    async fn save_safe_zones(&self, zones: &[SafeZone]) -> Result<(), StoreError> {
        self.check_writable("safe_zones")?;
        self.collections.lock().await.safe_zones = zones.to_vec();
        Ok(())
    }

    async fn alerts(&self) -> Vec<Alert> {
        self.collections.lock().await.alerts.clone()
    }

    async fn save_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        self.check_writable("pet_alerts")?;
        self.collections.lock().await.alerts = alerts.to_vec();
        Ok(())
    }

    async fn zone_memberships(&self) -> Vec<ZoneMembership> {
        self.collections.lock().await.memberships.clone()
    }

    async fn save_zone_memberships(
        &self,
        memberships: &[ZoneMembership],
    ) -> Result<(), StoreError> {
        self.check_writable("zone_memberships")?;
        self.collections.lock().await.memberships = memberships.to_vec();
        Ok(())
    }
}
