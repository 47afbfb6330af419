//! Alert retention background job.

use std::sync::Arc;

use domain::services::TrackingService;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

/// Deletes alerts older than the retention window.
pub struct AlertCleanupJob {
    service: Arc<TrackingService>,
    interval_minutes: u64,
}

impl AlertCleanupJob {
    pub fn new(service: Arc<TrackingService>, interval_minutes: u64) -> Self {
        Self {
            service,
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for AlertCleanupJob {
    fn name(&self) -> &'static str {
        "alert_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        if self.interval_minutes == 60 {
            JobFrequency::Hourly
        } else {
            JobFrequency::Minutes(self.interval_minutes)
        }
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = self
            .service
            .alerts()
            .cleanup_old_alerts()
            .await
            .map_err(|e| format!("Failed to clean up alerts: {}", e))?;

        if removed > 0 {
            info!(removed, "Cleaned up old alerts");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;

    #[test]
    fn test_cleanup_frequency() {
        let (service, _) = test_service();
        assert_eq!(
            AlertCleanupJob::new(service.clone(), 60).frequency(),
            JobFrequency::Hourly
        );
        assert_eq!(
            AlertCleanupJob::new(service, 15).frequency(),
            JobFrequency::Minutes(15)
        );
    }

    #[tokio::test]
    async fn test_cleanup_on_empty_store() {
        let (service, _) = test_service();
        let job = AlertCleanupJob::new(service, 60);
        assert_eq!(job.name(), "alert_cleanup");
        assert!(job.execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_skips_write_when_nothing_pruned() {
        let (service, store) = test_service();
        store.set_fail_writes(true);
        let job = AlertCleanupJob::new(service, 60);
        // Nothing to prune, so nothing is written.
        assert!(job.execute().await.is_ok());
    }
}
