//! Safe zone (circular geofence) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::geodesy::Coordinate;
use uuid::Uuid;
use validator::Validate;

/// Which transitions and channels a zone notifies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneNotifications {
    #[serde(default)]
    pub on_entry: bool,
    #[serde(default = "default_true")]
    pub on_exit: bool,
    #[serde(default)]
    pub email: bool,
    #[serde(default = "default_true")]
    pub push: bool,
}

impl Default for ZoneNotifications {
    fn default() -> Self {
        Self {
            on_entry: false,
            on_exit: true,
            email: false,
            push: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A named circular region monitored for one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeZone {
    pub id: Uuid,
    pub pet_id: String,
    pub name: String,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub radius_meters: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub notifications: ZoneNotifications,
}

impl SafeZone {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_latitude, self.center_longitude)
    }

    /// Distance in meters from the zone center to `point`.
    pub fn distance_from_center(&self, point: &Coordinate) -> f64 {
        self.center().distance_to(point)
    }

    /// Whether `point` lies inside the zone; the boundary counts as inside.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.distance_from_center(point) <= self.radius_meters
    }
}

/// Persisted "currently inside" flag for a (pet, zone) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMembership {
    pub pet_id: String,
    pub zone_id: Uuid,
    pub inside: bool,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a safe zone.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSafeZoneRequest {
    #[validate(length(min = 1, max = 64, message = "Pet ID must be 1-64 characters"))]
    pub pet_id: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub center_latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub center_longitude: f64,

    #[validate(custom(function = "shared::validation::validate_zone_radius"))]
    pub radius_meters: f64,

    #[serde(default)]
    pub notifications: ZoneNotifications,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Response for listing safe zones.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSafeZonesResponse {
    pub safe_zones: Vec<SafeZone>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(radius: f64) -> SafeZone {
        SafeZone {
            id: Uuid::new_v4(),
            pet_id: "p1".to_string(),
            name: "Home".to_string(),
            center_latitude: 19.4326,
            center_longitude: -99.1332,
            radius_meters: radius,
            is_active: true,
            created_at: Utc::now(),
            notifications: ZoneNotifications::default(),
        }
    }

    #[test]
    fn test_contains_center() {
        let z = zone(300.0);
        assert!(z.contains(&Coordinate::new(19.4326, -99.1332)));
        assert_eq!(z.distance_from_center(&z.center()), 0.0);
    }

    #[test]
    fn test_contains_rejects_far_point() {
        let z = zone(300.0);
        assert!(!z.contains(&Coordinate::new(19.4426, -99.1332)));
    }

    #[test]
    fn test_contains_boundary_is_inside() {
        let z = zone(300.0);
        let point = Coordinate::new(19.4336, -99.1332);
        let exact = z.distance_from_center(&point);
        let on_edge = SafeZone {
            radius_meters: exact,
            ..z
        };
        assert!(on_edge.contains(&point));
    }

    #[test]
    fn test_default_notifications() {
        let n = ZoneNotifications::default();
        assert!(n.on_exit);
        assert!(!n.on_entry);
        assert!(n.push);
        assert!(!n.email);
    }

    #[test]
    fn test_partial_notifications_fill_defaults() {
        let n: ZoneNotifications = serde_json::from_str(r#"{"onEntry": true}"#).unwrap();
        assert!(n.on_entry);
        assert!(n.on_exit);
        assert!(n.push);
    }

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{
            "petId": "p1",
            "name": "Park",
            "centerLatitude": 19.4326,
            "centerLongitude": -99.1332,
            "radiusMeters": 300
        }"#;
        let request: CreateSafeZoneRequest = serde_json::from_str(json).unwrap();
        assert!(request.is_active);
        assert_eq!(request.notifications, ZoneNotifications::default());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_tiny_radius() {
        let json = r#"{
            "petId": "p1",
            "name": "Park",
            "centerLatitude": 19.4326,
            "centerLongitude": -99.1332,
            "radiusMeters": 2
        }"#;
        let request: CreateSafeZoneRequest = serde_json::from_str(json).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("radius_meters"));
    }
}
