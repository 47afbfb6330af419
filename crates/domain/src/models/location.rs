//! Location fix domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::geodesy::Coordinate;
use validator::Validate;

/// Radio signal quality reported alongside a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    Strong,
    Medium,
    Weak,
    None,
}

impl SignalQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalQuality::Strong => "strong",
            SignalQuality::Medium => "medium",
            SignalQuality::Weak => "weak",
            SignalQuality::None => "none",
        }
    }
}

impl std::fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single GPS-like observation with device telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    /// Horizontal accuracy in meters.
    pub accuracy: f64,
    /// Battery charge, 0-100.
    pub battery_percent: u8,
    pub signal_quality: SignalQuality,
}

impl LocationFix {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Latest known fix for a pet. The store keeps exactly one per pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetLocation {
    pub pet_id: String,
    pub pet_name: String,
    pub chip_id: uuid::Uuid,
    #[serde(flatten)]
    pub fix: LocationFix,
}

/// Request payload for reporting a device fix.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportFixRequest {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    #[validate(custom(function = "shared::validation::validate_accuracy"))]
    pub accuracy: f64,

    #[validate(custom(function = "shared::validation::validate_battery_level"))]
    pub battery_percent: i32,

    pub signal_quality: SignalQuality,

    /// Capture time; defaults to the time the report is received.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ReportFixRequest {
    /// Converts a validated request into a fix, stamping `received_at` when
    /// the device did not supply a capture time.
    pub fn into_fix(self, received_at: DateTime<Utc>) -> LocationFix {
        LocationFix {
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.timestamp.unwrap_or(received_at),
            accuracy: self.accuracy,
            battery_percent: self.battery_percent.clamp(0, 100) as u8,
            signal_quality: self.signal_quality,
        }
    }
}

/// Response for listing pets with a known location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetLocationsResponse {
    pub pets: Vec<PetLocation>,
    pub total: usize,
}
