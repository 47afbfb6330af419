//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use domain::services::{NoDevicePosition, RecordingNotificationSink, SimulatedLocationSource, TrackingService};
use domain::{InMemoryTrackingStore, ManualClock};

pub fn test_service() -> (Arc<TrackingService>, Arc<InMemoryTrackingStore>) {
    let store = Arc::new(InMemoryTrackingStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));
    let source = Arc::new(SimulatedLocationSource::with_seed(
        Arc::new(NoDevicePosition),
        clock.clone(),
        11,
    ));
    let service = TrackingService::new(
        store.clone(),
        clock,
        source,
        Arc::new(RecordingNotificationSink::new()),
    );
    (Arc::new(service), store)
}
