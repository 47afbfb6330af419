//! HTTP route handlers.

pub mod alerts;
pub mod chips;
pub mod health;
pub mod pets;
pub mod safe_zones;
