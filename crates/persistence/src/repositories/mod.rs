//! Store implementations over key-value backends.

pub mod tracking;

pub use tracking::{
    KvTrackingStore, ALERTS_KEY, CHIPS_KEY, LOCATIONS_KEY, SAFE_ZONES_KEY, ZONE_MEMBERSHIPS_KEY,
};
