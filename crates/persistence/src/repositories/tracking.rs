//! Tracking store backed by a key-value backend.

use std::sync::Arc;

use async_trait::async_trait;
use domain::error::StoreError;
use domain::models::{Alert, ChipRecord, PetLocation, SafeZone, ZoneMembership};
use domain::store::TrackingStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use crate::kv::KeyValueBackend;
use crate::metrics::StoreTimer;

pub const CHIPS_KEY: &str = "pet_chips";
pub const LOCATIONS_KEY: &str = "pet_locations";
pub const SAFE_ZONES_KEY: &str = "safe_zones";
pub const ALERTS_KEY: &str = "pet_alerts";
pub const ZONE_MEMBERSHIPS_KEY: &str = "zone_memberships";

/// [`TrackingStore`] keeping each collection as a JSON array under its key.
#[derive(Clone)]
pub struct KvTrackingStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl KvTrackingStore {
    /// Creates a new KvTrackingStore over the given backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    async fn read<T: DeserializeOwned>(&self, key: &'static str) -> Vec<T> {
        let timer = StoreTimer::new("read", key);
        let raw = self.backend.get(key).await;
        timer.record();

        match raw {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(collection = key, error = %e, "Malformed collection, treating as empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(collection = key, error = %e, "Failed to read collection, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write<T: Serialize + Sync>(&self, key: &'static str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items).map_err(|e| {
            error!(collection = key, error = %e, "Failed to serialize collection");
            StoreError::Serialization {
                collection: key,
                message: e.to_string(),
            }
        })?;

        let timer = StoreTimer::new("write", key);
        let result = self.backend.set(key, raw).await;
        timer.record();

        result.map_err(|e| {
            error!(collection = key, error = %e, "Failed to write collection");
            StoreError::Write {
                collection: key,
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl TrackingStore for KvTrackingStore {
    async fn chips(&self) -> Vec<ChipRecord> {
        self.read(CHIPS_KEY).await
    }

    async fn save_chips(&self, chips: &[ChipRecord]) -> Result<(), StoreError> {
        self.write(CHIPS_KEY, chips).await
    }

    async fn locations(&self) -> Vec<PetLocation> {
        self.read(LOCATIONS_KEY).await
    }

    async fn save_locations(&self, locations: &[PetLocation]) -> Result<(), StoreError> {
        self.write(LOCATIONS_KEY, locations).await
    }

    async fn safe_zones(&self) -> Vec<SafeZone> {
        self.read(SAFE_ZONES_KEY).await
    }

    async fn save_safe_zones(&self, zones: &[SafeZone]) -> Result<(), StoreError> {
        self.write(SAFE_ZONES_KEY, zones).await
    }

    async fn alerts(&self) -> Vec<Alert> {
        self.read(ALERTS_KEY).await
    }

    async fn save_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        self.write(ALERTS_KEY, alerts).await
    }

    async fn zone_memberships(&self) -> Vec<ZoneMembership> {
        self.read(ZONE_MEMBERSHIPS_KEY).await
    }

    async fn save_zone_memberships(
        &self,
        memberships: &[ZoneMembership],
    ) -> Result<(), StoreError> {
        self.write(ZONE_MEMBERSHIPS_KEY, memberships).await
    }
}
