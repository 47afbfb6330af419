//! Alert domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::LocationFix;

/// Kind of event an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ZoneExit,
    ZoneEntry,
    LowBattery,
    NoSignal,
    Found,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ZoneExit => "zone_exit",
            AlertType::ZoneEntry => "zone_entry",
            AlertType::LowBattery => "low_battery",
            AlertType::NoSignal => "no_signal",
            AlertType::Found => "found",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Low => "low",
            AlertPriority::Medium => "medium",
            AlertPriority::High => "high",
            AlertPriority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification record raised by the alert engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub pet_id: String,
    pub chip_id: Uuid,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Fix that triggered the alert, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationFix>,
    pub is_read: bool,
    pub priority: AlertPriority,
}

/// Everything the engine needs to raise an alert; id, timestamp and read
/// state are assigned on creation.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub pet_id: String,
    pub chip_id: Uuid,
    pub alert_type: AlertType,
    pub message: String,
    pub location: Option<LocationFix>,
    pub priority: AlertPriority,
}

/// Query parameters for listing a pet's alerts.
#[derive(Debug, Clone, Deserialize)]
pub struct ListAlertsQuery {
    pub limit: Option<usize>,
}

/// Query parameters for the unread counter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountQuery {
    pub pet_id: Option<String>,
}

/// Response for listing alerts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlertsResponse {
    pub alerts: Vec<Alert>,
    pub total: usize,
}

/// Response for the unread counter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread: usize,
}

/// Response for bulk alert mutations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsAffectedResponse {
    pub affected: usize,
}
