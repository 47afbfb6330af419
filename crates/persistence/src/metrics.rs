//! Store metrics collection.
//!
//! Provides functions for recording storage-related metrics.

use metrics::histogram;
use std::time::Instant;

/// Record the duration of a store operation.
pub fn record_store_operation(operation: &'static str, collection: &'static str, duration_secs: f64) {
    histogram!(
        "store_operation_duration_seconds",
        "operation" => operation,
        "collection" => collection
    )
    .record(duration_secs);
}

/// A helper to time store operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = StoreTimer::new("read", "pet_alerts");
/// let raw = backend.get("pet_alerts").await;
/// timer.record();
/// ```
pub struct StoreTimer {
    operation: &'static str,
    collection: &'static str,
    start: Instant,
}

impl StoreTimer {
    /// Create a new timer for an operation on a collection.
    pub fn new(operation: &'static str, collection: &'static str) -> Self {
        Self {
            operation,
            collection,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_store_operation(self.operation, self.collection, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timer_creation() {
        let timer = StoreTimer::new("read", "pet_chips");
        assert_eq!(timer.operation, "read");
        assert_eq!(timer.collection, "pet_chips");
    }

    #[test]
    fn test_store_timer_records_without_recorder() {
        // No global recorder installed: recording is a no-op.
        StoreTimer::new("write", "pet_alerts").record();
    }
}
