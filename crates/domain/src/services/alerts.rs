//! Alert engine: creation, throttling and queries.
//!
//! Alerts are kept newest-first. Zone transitions always alert when the zone
//! asks for it; battery and signal alerts are throttled per pet so a chip
//! that stays low or silent does not flood its owner.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::geofence::{GeofenceEvaluator, TransitionKind, ZoneTransition};
use super::notification::{NotificationResult, NotificationSink};
use super::WriteGate;
use crate::clock::Clock;
use crate::error::StoreError;
use crate::models::{Alert, AlertPriority, AlertType, NewAlert, PetLocation};
use crate::store::TrackingStore;

/// Battery percentage at or below which a low-battery alert is raised.
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// Minimum spacing between two low-battery alerts for the same pet.
pub fn low_battery_cooldown() -> Duration {
    Duration::hours(6)
}

/// Fix age past which the chip is considered silent.
pub fn signal_loss_after() -> Duration {
    Duration::minutes(60)
}

/// Minimum spacing between two no-signal alerts for the same pet.
pub fn no_signal_cooldown() -> Duration {
    Duration::hours(2)
}

/// How long alerts are retained before the cleanup sweep removes them.
pub fn alert_retention() -> Duration {
    Duration::days(30)
}

/// Creates, throttles and serves alerts.
#[derive(Clone)]
pub struct AlertEngine {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    geofence: GeofenceEvaluator,
    gate: WriteGate,
}

impl AlertEngine {
    pub fn new(
        store: Arc<dyn TrackingStore>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn NotificationSink>,
        gate: WriteGate,
    ) -> Self {
        let geofence = GeofenceEvaluator::new(store.clone(), clock.clone());
        Self {
            store,
            clock,
            sink,
            geofence,
            gate,
        }
    }

    /// Runs every check against a freshly stored fix.
    ///
    /// The caller must hold the write gate.
    pub async fn evaluate(&self, location: &PetLocation) -> Result<Vec<Alert>, StoreError> {
        let mut raised = self.check_safe_zone_violations(location).await?;
        raised.extend(self.check_battery_level(location).await?);
        raised.extend(self.check_signal_status(location).await?);
        Ok(raised)
    }

    /// Stores a new unread alert at the head of the list and dispatches it.
    ///
    /// The caller must hold the write gate.
    pub async fn create_alert(&self, new_alert: NewAlert) -> Result<Alert, StoreError> {
        let alert = Alert {
            id: Uuid::new_v4(),
            pet_id: new_alert.pet_id,
            chip_id: new_alert.chip_id,
            alert_type: new_alert.alert_type,
            message: new_alert.message,
            timestamp: self.clock.now(),
            location: new_alert.location,
            is_read: false,
            priority: new_alert.priority,
        };

        let mut alerts = self.store.alerts().await;
        alerts.insert(0, alert.clone());
        self.store.save_alerts(&alerts).await?;

        info!(
            alert_id = %alert.id,
            pet_id = %alert.pet_id,
            alert_type = %alert.alert_type,
            priority = %alert.priority,
            "Alert created"
        );

        if let NotificationResult::Failed(reason) = self.sink.dispatch(&alert).await {
            warn!(alert_id = %alert.id, error = %reason, "Alert notification failed");
        }

        Ok(alert)
    }

    /// Raises a `low_battery` alert when the fix reports a battery at or
    /// below the threshold and the pet has no recent one.
    pub async fn check_battery_level(
        &self,
        location: &PetLocation,
    ) -> Result<Option<Alert>, StoreError> {
        let battery = location.fix.battery_percent;
        if battery > LOW_BATTERY_THRESHOLD {
            return Ok(None);
        }

        if !self
            .cooldown_elapsed(&location.pet_id, AlertType::LowBattery, low_battery_cooldown())
            .await
        {
            return Ok(None);
        }

        let alert = self
            .create_alert(NewAlert {
                pet_id: location.pet_id.clone(),
                chip_id: location.chip_id,
                alert_type: AlertType::LowBattery,
                message: format!(
                    "{}'s chip battery is low ({}%)",
                    location.pet_name, battery
                ),
                location: Some(location.fix.clone()),
                priority: AlertPriority::Medium,
            })
            .await?;
        Ok(Some(alert))
    }

    /// Raises a `no_signal` alert when the fix is older than the signal-loss
    /// window and the pet has no recent one.
    pub async fn check_signal_status(
        &self,
        location: &PetLocation,
    ) -> Result<Option<Alert>, StoreError> {
        let age = self.clock.now() - location.fix.timestamp;
        if age <= signal_loss_after() {
            return Ok(None);
        }

        if !self
            .cooldown_elapsed(&location.pet_id, AlertType::NoSignal, no_signal_cooldown())
            .await
        {
            return Ok(None);
        }

        let alert = self
            .create_alert(NewAlert {
                pet_id: location.pet_id.clone(),
                chip_id: location.chip_id,
                alert_type: AlertType::NoSignal,
                message: format!(
                    "No signal from {}'s chip for {} minutes",
                    location.pet_name,
                    age.num_minutes()
                ),
                location: Some(location.fix.clone()),
                priority: AlertPriority::Critical,
            })
            .await?;
        Ok(Some(alert))
    }

    /// Runs the geofence evaluator and raises alerts for the transitions the
    /// zones notify on.
    pub async fn check_safe_zone_violations(
        &self,
        location: &PetLocation,
    ) -> Result<Vec<Alert>, StoreError> {
        let transitions = self.geofence.evaluate(location).await?;
        let mut raised = Vec::new();

        for transition in transitions.iter().filter(|t| t.should_notify()) {
            raised.push(self.create_alert(zone_alert(location, transition)).await?);
        }

        Ok(raised)
    }

    /// Alerts for a pet, newest first, optionally truncated to `limit`.
    pub async fn alerts_for_pet(&self, pet_id: &str, limit: Option<usize>) -> Vec<Alert> {
        let alerts = self
            .store
            .alerts()
            .await
            .into_iter()
            .filter(|a| a.pet_id == pet_id);

        match limit {
            Some(limit) => alerts.take(limit).collect(),
            None => alerts.collect(),
        }
    }

    /// Unread alerts for one pet, or across all pets when `pet_id` is `None`.
    pub async fn unread_count(&self, pet_id: Option<&str>) -> usize {
        self.store
            .alerts()
            .await
            .iter()
            .filter(|a| !a.is_read)
            .filter(|a| pet_id.map_or(true, |p| a.pet_id == p))
            .count()
    }

    /// Marks one alert read. Returns false when no such alert exists.
    pub async fn mark_as_read(&self, alert_id: Uuid) -> Result<bool, StoreError> {
        let _guard = self.gate.lock().await;
        let mut alerts = self.store.alerts().await;

        let Some(alert) = alerts.iter_mut().find(|a| a.id == alert_id) else {
            return Ok(false);
        };
        if !alert.is_read {
            alert.is_read = true;
            self.store.save_alerts(&alerts).await?;
        }
        Ok(true)
    }

    /// Marks every alert of a pet read. Returns how many changed.
    pub async fn mark_all_as_read(&self, pet_id: &str) -> Result<usize, StoreError> {
        let _guard = self.gate.lock().await;
        let mut alerts = self.store.alerts().await;

        let mut changed = 0;
        for alert in alerts.iter_mut().filter(|a| a.pet_id == pet_id && !a.is_read) {
            alert.is_read = true;
            changed += 1;
        }

        if changed > 0 {
            self.store.save_alerts(&alerts).await?;
        }
        Ok(changed)
    }

    /// Deletes alerts older than the retention window. Writes only when
    /// something was pruned. Returns how many were removed.
    pub async fn cleanup_old_alerts(&self) -> Result<usize, StoreError> {
        let _guard = self.gate.lock().await;
        let cutoff = self.clock.now() - alert_retention();
        let alerts = self.store.alerts().await;
        let before = alerts.len();

        let kept: Vec<Alert> = alerts.into_iter().filter(|a| a.timestamp >= cutoff).collect();
        let removed = before - kept.len();

        if removed > 0 {
            self.store.save_alerts(&kept).await?;
            info!(removed, retained = kept.len(), "Pruned old alerts");
        }
        Ok(removed)
    }

    /// True when the pet has no alert of `alert_type`, or its latest one is
    /// strictly older than `cooldown`.
    async fn cooldown_elapsed(&self, pet_id: &str, alert_type: AlertType, cooldown: Duration) -> bool {
        let last: Option<DateTime<Utc>> = self
            .store
            .alerts()
            .await
            .iter()
            .filter(|a| a.pet_id == pet_id && a.alert_type == alert_type)
            .map(|a| a.timestamp)
            .max();

        match last {
            Some(last) => self.clock.now() - last > cooldown,
            None => true,
        }
    }
}

fn zone_alert(location: &PetLocation, transition: &ZoneTransition) -> NewAlert {
    let (alert_type, priority, message) = match transition.kind {
        TransitionKind::Exited => (
            AlertType::ZoneExit,
            AlertPriority::High,
            format!(
                "{} has left the safe zone \"{}\"",
                location.pet_name, transition.zone.name
            ),
        ),
        TransitionKind::Entered => (
            AlertType::ZoneEntry,
            AlertPriority::Medium,
            format!(
                "{} has entered the safe zone \"{}\"",
                location.pet_name, transition.zone.name
            ),
        ),
    };

    NewAlert {
        pet_id: location.pet_id.clone(),
        chip_id: location.chip_id,
        alert_type,
        message,
        location: Some(location.fix.clone()),
        priority,
    }
}
