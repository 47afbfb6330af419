//! Notification sink used by the running service.

use std::sync::Arc;

use async_trait::async_trait;
use domain::models::Alert;
use domain::services::{NotificationResult, NotificationSink};

use crate::middleware::metrics::record_alert_created;

/// Counts `alerts_created_total` and forwards to an inner sink.
pub struct MetricsNotificationSink {
    inner: Arc<dyn NotificationSink>,
}

impl MetricsNotificationSink {
    pub fn new(inner: Arc<dyn NotificationSink>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl NotificationSink for MetricsNotificationSink {
    async fn dispatch(&self, alert: &Alert) -> NotificationResult {
        record_alert_created(alert.alert_type, alert.priority);
        self.inner.dispatch(alert).await
    }
}
