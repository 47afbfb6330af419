//! Location sources.
//!
//! A [`LocationSource`] produces the next fix for a pet. The rest of the
//! pipeline only sees the resulting [`LocationFix`], so the simulated source
//! and the device-reported source are interchangeable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::geodesy::Coordinate;
use tracing::debug;

use crate::clock::Clock;
use crate::error::IngestError;
use crate::models::{LocationFix, SignalQuality};

/// Coordinate used when the owner's device position is unavailable.
pub const FALLBACK_COORDINATE: Coordinate = Coordinate {
    latitude: 19.4326,
    longitude: -99.1332,
};

/// Maximum wander applied to the base coordinate, in degrees per axis.
pub const MAX_WANDER_DEGREES: f64 = 0.0025;

/// Produces location fixes for pets.
#[async_trait::async_trait]
pub trait LocationSource: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Produce the next fix for `pet_id`.
    async fn produce_fix(&self, pet_id: &str) -> Result<LocationFix, IngestError>;

    /// Offer a device-reported fix. Sources that buffer reports keep it for
    /// the next tick and return true; others decline.
    async fn offer(&self, _pet_id: &str, _fix: &LocationFix) -> bool {
        false
    }
}

/// Permission-gated access to the owner's current device position.
#[async_trait::async_trait]
pub trait DevicePositionProvider: Send + Sync {
    /// `Ok(None)` when permission was not granted; `Err` when the position
    /// could not be read.
    async fn current_position(&self) -> Result<Option<Coordinate>, IngestError>;
}

/// Provider for hosts without a device position.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevicePosition;

#[async_trait::async_trait]
impl DevicePositionProvider for NoDevicePosition {
    async fn current_position(&self) -> Result<Option<Coordinate>, IngestError> {
        Ok(None)
    }
}

/// Provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct StaticDevicePosition(pub Coordinate);

#[async_trait::async_trait]
impl DevicePositionProvider for StaticDevicePosition {
    async fn current_position(&self) -> Result<Option<Coordinate>, IngestError> {
        Ok(Some(self.0))
    }
}

/// Randomized fixes wandering around a base coordinate.
pub struct SimulatedLocationSource {
    device: Arc<dyn DevicePositionProvider>,
    clock: Arc<dyn Clock>,
    fallback: Coordinate,
    rng: Mutex<StdRng>,
}

impl SimulatedLocationSource {
    pub fn new(device: Arc<dyn DevicePositionProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            device,
            clock,
            fallback: FALLBACK_COORDINATE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic source for tests.
    pub fn with_seed(
        device: Arc<dyn DevicePositionProvider>,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..Self::new(device, clock)
        }
    }

    /// Replace the coordinate used when no device position is available.
    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    async fn base_coordinate(&self, pet_id: &str) -> Coordinate {
        match self.device.current_position().await {
            Ok(Some(position)) => position,
            Ok(None) => {
                debug!(pet_id, "Device position not granted, using fallback");
                self.fallback
            }
            Err(e) => {
                debug!(pet_id, error = %e, "Device position unavailable, using fallback");
                self.fallback
            }
        }
    }
}

#[async_trait::async_trait]
impl LocationSource for SimulatedLocationSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn produce_fix(&self, pet_id: &str) -> Result<LocationFix, IngestError> {
        let base = self.base_coordinate(pet_id).await;
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let latitude = base.latitude + rng.gen_range(-MAX_WANDER_DEGREES..=MAX_WANDER_DEGREES);
        let longitude = base.longitude + rng.gen_range(-MAX_WANDER_DEGREES..=MAX_WANDER_DEGREES);
        let accuracy = rng.gen_range(5.0..=15.0);
        // Mostly healthy, occasionally draining, never below 20.
        let battery_percent = if rng.gen_bool(0.9) {
            rng.gen_range(70..=100)
        } else {
            rng.gen_range(20..70)
        };
        let signal_quality = match rng.gen_range(0..3) {
            0 => SignalQuality::Strong,
            1 => SignalQuality::Medium,
            _ => SignalQuality::Weak,
        };

        Ok(LocationFix {
            latitude,
            longitude,
            timestamp: self.clock.now(),
            accuracy,
            battery_percent,
            signal_quality,
        })
    }
}

/// Fixes reported by real devices, buffered until the next tick.
///
/// Only the newest report per pet is kept; consuming it empties the slot.
#[derive(Debug, Default)]
pub struct ReportedLocationSource {
    pending: tokio::sync::Mutex<HashMap<String, LocationFix>>,
}

impl ReportedLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[async_trait::async_trait]
impl LocationSource for ReportedLocationSource {
    fn name(&self) -> &'static str {
        "device"
    }

    async fn produce_fix(&self, pet_id: &str) -> Result<LocationFix, IngestError> {
        self.pending
            .lock()
            .await
            .remove(pet_id)
            .ok_or_else(|| IngestError::NoFix(pet_id.to_string()))
    }

    async fn offer(&self, pet_id: &str, fix: &LocationFix) -> bool {
        let mut pending = self.pending.lock().await;
        match pending.get(pet_id) {
            Some(existing) if existing.timestamp > fix.timestamp => {
                debug!(pet_id, "Ignoring report older than the buffered fix");
            }
            _ => {
                pending.insert(pet_id.to_string(), fix.clone());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    struct DeniedPosition;

    #[async_trait::async_trait]
    impl DevicePositionProvider for DeniedPosition {
        async fn current_position(&self) -> Result<Option<Coordinate>, IngestError> {
            Err(IngestError::Unavailable("location permission denied".to_string()))
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn fix_at(timestamp: chrono::DateTime<Utc>, latitude: f64) -> LocationFix {
        LocationFix {
            latitude,
            longitude: 0.0,
            timestamp,
            accuracy: 4.0,
            battery_percent: 55,
            signal_quality: SignalQuality::Strong,
        }
    }

    #[tokio::test]
    async fn test_simulated_fix_ranges() {
        let clock = clock();
        let source = SimulatedLocationSource::with_seed(Arc::new(NoDevicePosition), clock.clone(), 7);

        for _ in 0..200 {
            let fix = source.produce_fix("p1").await.unwrap();
            assert!((fix.latitude - FALLBACK_COORDINATE.latitude).abs() <= MAX_WANDER_DEGREES + 1e-12);
            assert!((fix.longitude - FALLBACK_COORDINATE.longitude).abs() <= MAX_WANDER_DEGREES + 1e-12);
            assert!((5.0..=15.0).contains(&fix.accuracy));
            assert!((20..=100).contains(&fix.battery_percent));
            assert_ne!(fix.signal_quality, SignalQuality::None);
            assert_eq!(fix.timestamp, clock.now());
        }
    }

    #[tokio::test]
    async fn test_simulated_uses_device_position() {
        let home = Coordinate::new(40.4168, -3.7038);
        let source = SimulatedLocationSource::with_seed(Arc::new(StaticDevicePosition(home)), clock(), 1);
        let fix = source.produce_fix("p1").await.unwrap();
        assert!((fix.latitude - home.latitude).abs() <= MAX_WANDER_DEGREES + 1e-12);
        assert!((fix.longitude - home.longitude).abs() <= MAX_WANDER_DEGREES + 1e-12);
    }

    #[tokio::test]
    async fn test_simulated_falls_back_when_position_fails() {
        let fallback = Coordinate::new(51.5074, -0.1278);
        let source = SimulatedLocationSource::with_seed(Arc::new(DeniedPosition), clock(), 3)
            .with_fallback(fallback);
        let fix = source.produce_fix("p1").await.unwrap();
        assert!((fix.latitude - fallback.latitude).abs() <= MAX_WANDER_DEGREES + 1e-12);
    }

    #[tokio::test]
    async fn test_simulated_source_never_buffers() {
        let source = SimulatedLocationSource::new(Arc::new(NoDevicePosition), clock());
        assert!(!source.offer("p1", &fix_at(Utc::now(), 1.0)).await);
        assert_eq!(source.name(), "simulated");
    }

    #[tokio::test]
    async fn test_reported_source_consumes_once() {
        let source = ReportedLocationSource::new();
        assert!(matches!(
            source.produce_fix("p1").await,
            Err(IngestError::NoFix(_))
        ));

        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(source.offer("p1", &fix_at(t, 1.0)).await);
        assert_eq!(source.pending_count().await, 1);

        let fix = source.produce_fix("p1").await.unwrap();
        assert_eq!(fix.latitude, 1.0);
        tokio_test::assert_err!(source.produce_fix("p1").await);
    }

    #[tokio::test]
    async fn test_reported_source_keeps_newest() {
        let source = ReportedLocationSource::new();
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        source.offer("p1", &fix_at(t, 1.0)).await;
        source.offer("p1", &fix_at(t - Duration::minutes(5), 2.0)).await;
        source.offer("p2", &fix_at(t, 3.0)).await;

        assert_eq!(source.produce_fix("p1").await.unwrap().latitude, 1.0);
        assert_eq!(source.produce_fix("p2").await.unwrap().latitude, 3.0);
        assert_eq!(source.name(), "device");
    }
}
