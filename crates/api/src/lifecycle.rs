//! Service construction and tracking lifecycle.

use std::sync::Arc;
use std::time::Duration;

use domain::services::{
    LocationSource, LogNotificationSink, NoDevicePosition, ReportedLocationSource,
    SimulatedLocationSource, TrackingService,
};
use domain::{DomainError, SystemClock};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{Config, IngestionMode};
use crate::jobs::{AlertCleanupJob, JobScheduler, TrackingTickJob};
use crate::services::MetricsNotificationSink;

/// How long `stop_tracking` waits for an in-flight tick.
const STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the tracking service described by `config`.
pub async fn build_service(config: &Config) -> anyhow::Result<Arc<TrackingService>> {
    let storage = config.storage_config()?;
    let store = persistence::open_store(&storage).await?;
    info!(backend = store.backend_name(), "Storage opened");

    let clock = Arc::new(SystemClock);
    let source: Arc<dyn LocationSource> = match config.ingestion_mode()? {
        IngestionMode::Simulated => Arc::new(
            SimulatedLocationSource::new(Arc::new(NoDevicePosition), clock.clone())
                .with_fallback(config.fallback_coordinate()),
        ),
        IngestionMode::Device => Arc::new(ReportedLocationSource::new()),
    };
    info!(source = source.name(), "Location source selected");

    let sink = Arc::new(MetricsNotificationSink::new(Arc::new(LogNotificationSink)));
    Ok(Arc::new(TrackingService::new(
        Arc::new(store),
        clock,
        source,
        sink,
    )))
}

/// Owns the background jobs driving a [`TrackingService`].
pub struct Tracker {
    service: Arc<TrackingService>,
    scheduler: Mutex<JobScheduler>,
    seed_demo_chip: bool,
}

impl Tracker {
    pub fn new(service: Arc<TrackingService>, config: &Config) -> Self {
        let mut scheduler = JobScheduler::new();
        scheduler.register(TrackingTickJob::new(
            service.clone(),
            config.tracking.interval_secs,
        ));
        scheduler.register(AlertCleanupJob::new(
            service.clone(),
            config.alerts.cleanup_interval_minutes,
        ));

        Self {
            service,
            scheduler: Mutex::new(scheduler),
            seed_demo_chip: config.tracking.seed_demo_chip,
        }
    }

    pub fn service(&self) -> &Arc<TrackingService> {
        &self.service
    }

    /// Seeds the demo chip when configured and starts the jobs.
    /// Calling it again while running does not start a second schedule.
    pub async fn initialize(&self) -> Result<(), DomainError> {
        if self.seed_demo_chip {
            if let Some(chip) = self.service.seed_demo_chip_if_empty().await? {
                info!(chip_id = %chip.id, pet_id = %chip.pet_id, "Demo chip seeded");
            }
        }

        self.scheduler.lock().await.start();
        Ok(())
    }

    /// Stops future ticks. Safe to call when not running.
    pub async fn stop_tracking(&self) {
        self.scheduler.lock().await.stop(STOP_TIMEOUT).await;
    }

    pub async fn is_running(&self) -> bool {
        self.scheduler.lock().await.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use domain::TrackingStore;

    fn config(overrides: &[(&str, &str)]) -> Config {
        Config::load_for_test(overrides).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_seeds_and_starts() {
        let (service, store) = test_service();
        let tracker = Tracker::new(service, &config(&[]));

        tracker.initialize().await.unwrap();
        assert!(tracker.is_running().await);
        assert_eq!(store.chips().await.len(), 1);

        // Second call neither reseeds nor double-starts.
        tracker.initialize().await.unwrap();
        assert_eq!(store.chips().await.len(), 1);

        tracker.stop_tracking().await;
        assert!(!tracker.is_running().await);
        tracker.stop_tracking().await;
    }

    #[tokio::test]
    async fn test_initialize_without_seed() {
        let (service, store) = test_service();
        let tracker = Tracker::new(service, &config(&[("tracking.seed_demo_chip", "false")]));
        tracker.initialize().await.unwrap();
        assert!(store.chips().await.is_empty());
        tracker.stop_tracking().await;
    }

    #[tokio::test]
    async fn test_build_service_memory_device() {
        let service = build_service(&config(&[("tracking.ingestion", "device")]))
            .await
            .unwrap();
        assert_eq!(service.source_name(), "device");
    }

    #[tokio::test]
    async fn test_build_service_rejects_unknown_backend() {
        let result = build_service(&config(&[("storage.backend", "s3")])).await;
        assert!(result.is_err());
    }
}
