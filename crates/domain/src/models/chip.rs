//! Tracking chip domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A physical or simulated tracking chip bound to one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipRecord {
    pub id: Uuid,
    /// Canonical `CHIP-####-####-####` code.
    pub code: String,
    pub pet_id: String,
    pub pet_name: String,
    pub owner_id: String,
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
    /// Timestamp of the last fix ingested for this chip.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

/// The chip that represents `pet_id`: its active chip, or failing that the
/// most recently registered one.
pub fn chip_for_pet<'a>(chips: &'a [ChipRecord], pet_id: &str) -> Option<&'a ChipRecord> {
    chips
        .iter()
        .find(|c| c.pet_id == pet_id && c.is_active)
        .or_else(|| {
            chips
                .iter()
                .filter(|c| c.pet_id == pet_id)
                .max_by_key(|c| c.registered_at)
        })
}

/// Request payload for registering a chip to a pet.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChipRequest {
    #[validate(custom(function = "shared::validation::validate_chip_code"))]
    pub chip_code: String,

    #[validate(length(min = 1, max = 64, message = "Pet ID must be 1-64 characters"))]
    pub pet_id: String,

    #[validate(length(min = 1, max = 100, message = "Pet name must be 1-100 characters"))]
    pub pet_name: String,

    #[validate(length(min = 1, max = 64, message = "Owner ID must be 1-64 characters"))]
    pub owner_id: String,

    /// Verified chips are registered active; unverified ones wait for verification.
    #[serde(default)]
    pub is_verified: bool,
}

/// Result of checking a chip code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipVerification {
    pub is_valid: bool,
    pub is_registered: bool,
}

/// Query parameters for chip code verification.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyChipQuery {
    pub code: String,
}
