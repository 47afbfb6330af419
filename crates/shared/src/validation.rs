//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Maximum age of a reported fix in days (7 days).
const MAX_TIMESTAMP_AGE_DAYS: i64 = 7;

/// Maximum allowed future timestamp tolerance in seconds (5 minutes for clock skew).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 300;

/// Smallest safe zone radius accepted, in meters.
pub const MIN_ZONE_RADIUS_METERS: f64 = 10.0;

/// Largest safe zone radius accepted, in meters.
pub const MAX_ZONE_RADIUS_METERS: f64 = 50_000.0;

lazy_static::lazy_static! {
    /// Canonical chip code format: `CHIP-####-####-####`.
    pub static ref CHIP_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^CHIP-[0-9]{4}-[0-9]{4}-[0-9]{4}$").unwrap();
}

/// Returns true when `code` matches the canonical chip code format.
pub fn is_valid_chip_code(code: &str) -> bool {
    CHIP_CODE_REGEX.is_match(code)
}

/// Validates a chip code against the canonical `CHIP-####-####-####` format.
pub fn validate_chip_code(code: &str) -> Result<(), ValidationError> {
    if is_valid_chip_code(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("chip_code_format");
        err.message = Some("Chip code must match CHIP-####-####-####".into());
        Err(err)
    }
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that accuracy is non-negative.
pub fn validate_accuracy(accuracy: f64) -> Result<(), ValidationError> {
    if accuracy >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("accuracy_range");
        err.message = Some("Accuracy must be non-negative".into());
        Err(err)
    }
}

/// Validates that battery level is within valid range (0 to 100).
pub fn validate_battery_level(level: i32) -> Result<(), ValidationError> {
    if (0..=100).contains(&level) {
        Ok(())
    } else {
        let mut err = ValidationError::new("battery_range");
        err.message = Some("Battery level must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates a safe zone radius in meters.
pub fn validate_zone_radius(radius: f64) -> Result<(), ValidationError> {
    if (MIN_ZONE_RADIUS_METERS..=MAX_ZONE_RADIUS_METERS).contains(&radius) {
        Ok(())
    } else {
        let mut err = ValidationError::new("radius_range");
        err.message = Some("Radius must be between 10 and 50000 meters".into());
        Err(err)
    }
}

/// Validates that a fix timestamp is within acceptable range of `now`.
/// - Must not be more than 5 minutes in the future (allows for clock skew)
/// - Must not be older than 7 days
pub fn validate_fix_timestamp(
    timestamp: &DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let future_limit = now + chrono::Duration::seconds(MAX_FUTURE_TOLERANCE_SECS);
    if *timestamp > future_limit {
        let mut err = ValidationError::new("timestamp_future");
        err.message = Some("Timestamp cannot be in the future".into());
        return Err(err);
    }

    let past_limit = now - chrono::Duration::days(MAX_TIMESTAMP_AGE_DAYS);
    if *timestamp < past_limit {
        let mut err = ValidationError::new("timestamp_old");
        err.message = Some("Timestamp cannot be older than 7 days".into());
        return Err(err);
    }

    Ok(())
}
