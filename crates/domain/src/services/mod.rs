//! Domain services for the Pet Tracker.
//!
//! Services contain the tracking pipeline: ingestion, geofence evaluation,
//! alerting and status derivation.

use std::sync::Arc;

pub mod alerts;
pub mod geofence;
pub mod ingestion;
pub mod notification;
pub mod status;
pub mod tracking;

/// Serializes every read-modify-write of the stored collections.
///
/// Public mutating operations acquire it; internal steps that run inside an
/// already-gated operation do not.
pub type WriteGate = Arc<tokio::sync::Mutex<()>>;

pub use alerts::AlertEngine;
pub use geofence::{GeofenceEvaluator, TransitionKind, ZoneTransition};
pub use ingestion::{
    DevicePositionProvider, LocationSource, NoDevicePosition, ReportedLocationSource,
    SimulatedLocationSource, StaticDevicePosition, FALLBACK_COORDINATE,
};
pub use notification::{LogNotificationSink, NotificationResult, NotificationSink};
#[cfg(any(test, feature = "test-support"))]
pub use notification::RecordingNotificationSink;
pub use status::StatusAggregator;
pub use tracking::{FixDisposition, IngestOutcome, TickSummary, TrackingService};
