//! Domain layer for the Pet Tracker backend.
//!
//! This crate contains:
//! - Domain models (ChipRecord, LocationFix, SafeZone, Alert, ChipStatus)
//! - Ports for storage, time, location sources and notification sinks
//! - The tracking services (geofence evaluation, alerts, status)
//! - Domain error types

pub mod clock;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, IngestError, StoreError};
pub use store::{InMemoryTrackingStore, TrackingStore};
