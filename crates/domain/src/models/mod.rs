//! Domain models for the Pet Tracker.

pub mod alert;
pub mod chip;
pub mod location;
pub mod safe_zone;
pub mod status;

pub use alert::{Alert, AlertPriority, AlertType, NewAlert};
pub use chip::{ChipRecord, ChipVerification, RegisterChipRequest};
pub use location::{LocationFix, PetLocation, SignalQuality};
pub use safe_zone::{CreateSafeZoneRequest, SafeZone, ZoneMembership, ZoneNotifications};
pub use status::{ChipState, ChipStatus};
