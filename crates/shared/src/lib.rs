//! Shared utilities and common types for the Pet Tracker backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Great-circle distance on a spherical earth
//! - Common validation logic (coordinates, battery, chip codes)

pub mod geodesy;
pub mod validation;

pub use geodesy::{distance_meters, Coordinate, EARTH_RADIUS_METERS};
