//! Persistence layer for the Pet Tracker backend.
//!
//! This crate contains:
//! - Key-value backends (in-memory and JSON files)
//! - Backend selection from configuration
//! - The `TrackingStore` implementation over a backend

pub mod db;
pub mod kv;
pub mod metrics;
pub mod repositories;

pub use db::{open_backend, open_store, StorageConfig, StorageKind};
pub use kv::{BackendError, FileBackend, KeyValueBackend, MemoryBackend};
pub use repositories::KvTrackingStore;
