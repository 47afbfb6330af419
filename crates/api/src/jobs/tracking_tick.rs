//! Periodic tracking update job.

use std::sync::Arc;

use domain::services::TrackingService;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_fixes_ingested;

/// Pulls a fix for every active chip and runs it through the pipeline.
pub struct TrackingTickJob {
    service: Arc<TrackingService>,
    interval_secs: u64,
}

impl TrackingTickJob {
    pub fn new(service: Arc<TrackingService>, interval_secs: u64) -> Self {
        Self {
            service,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for TrackingTickJob {
    fn name(&self) -> &'static str {
        "tracking_tick"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        // Per-pet failures are logged by the service; the tick itself never fails.
        let summary = self.service.tick().await;
        record_fixes_ingested(self.service.source_name(), summary.processed as u64);

        debug!(
            processed = summary.processed,
            failed = summary.failed,
            alerts = summary.alerts,
            "Tracking tick finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;

    #[tokio::test]
    async fn test_tick_job_ingests_active_chips() {
        let (service, store) = test_service();
        service
            .register_chip(domain::models::RegisterChipRequest {
                chip_code: "CHIP-1234-5678-9012".to_string(),
                pet_id: "p1".to_string(),
                pet_name: "Luna".to_string(),
                owner_id: "owner-1".to_string(),
                is_verified: true,
            })
            .await
            .unwrap();

        let job = TrackingTickJob::new(service, 30);
        assert_eq!(job.name(), "tracking_tick");
        assert_eq!(job.frequency(), JobFrequency::Seconds(30));
        tokio_test::assert_ok!(job.execute().await);

        use domain::TrackingStore;
        assert_eq!(store.locations().await.len(), 1);
    }
}
