//! Notification sinks for created alerts.
//!
//! The alert engine hands every alert it creates to a [`NotificationSink`].
//! Delivery transports (push, email) plug in here without touching the engine.

use crate::models::Alert;

/// Result of a notification dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was handed to the transport.
    Sent,
    /// Dispatch failed; the alert itself is already stored.
    Failed(String),
    /// The sink chose not to deliver this alert.
    Skipped,
}

/// Destination for alert notifications.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn dispatch(&self, alert: &Alert) -> NotificationResult;
}

/// Reference sink: writes the alert to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

#[async_trait::async_trait]
impl NotificationSink for LogNotificationSink {
    async fn dispatch(&self, alert: &Alert) -> NotificationResult {
        tracing::info!(
            alert_id = %alert.id,
            pet_id = %alert.pet_id,
            alert_type = %alert.alert_type,
            priority = %alert.priority,
            "Pet alert: {}",
            alert.message
        );
        NotificationResult::Sent
    }
}

/// Sink that remembers every alert it receives.
///
/// Only built for tests and for crates enabling the `test-support` feature.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    dispatched: std::sync::Mutex<Vec<Alert>>,
    fail_dispatches: bool,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that reports every dispatch as failed.
    pub fn failing() -> Self {
        Self {
            dispatched: std::sync::Mutex::new(Vec::new()),
            fail_dispatches: true,
        }
    }

    pub fn dispatched(&self) -> Vec<Alert> {
        self.dispatched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait::async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn dispatch(&self, alert: &Alert) -> NotificationResult {
        self.dispatched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(alert.clone());

        if self.fail_dispatches {
            NotificationResult::Failed("Dispatch rejected".to_string())
        } else {
            NotificationResult::Sent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertPriority, AlertType};
    use uuid::Uuid;

    fn alert() -> Alert {
        Alert {
            id: Uuid::new_v4(),
            pet_id: "p1".to_string(),
            chip_id: Uuid::new_v4(),
            alert_type: AlertType::LowBattery,
            message: "Luna's chip battery is low (15%)".to_string(),
            timestamp: chrono::Utc::now(),
            location: None,
            is_read: false,
            priority: AlertPriority::Medium,
        }
    }

    #[tokio::test]
    async fn test_log_sink_reports_sent() {
        let sink = LogNotificationSink;
        assert_eq!(sink.dispatch(&alert()).await, NotificationResult::Sent);
    }

    #[tokio::test]
    async fn test_recording_sink_records() {
        let sink = RecordingNotificationSink::new();
        let a = alert();
        assert_eq!(sink.dispatch(&a).await, NotificationResult::Sent);
        assert_eq!(sink.dispatched(), vec![a]);
    }

    #[tokio::test]
    async fn test_failing_sink() {
        let sink = RecordingNotificationSink::failing();
        let result = sink.dispatch(&alert()).await;
        assert!(matches!(result, NotificationResult::Failed(_)));
        assert_eq!(sink.dispatched().len(), 1);
    }
}
