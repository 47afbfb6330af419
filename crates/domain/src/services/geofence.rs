//! Geofence evaluation.
//!
//! Each (pet, zone) pair is a two-state machine, `Outside` or `Inside`,
//! driven only by the most recent fix. The previous state is a single
//! persisted boolean, so an exit and re-entry that both happen between two
//! evaluated fixes are never observed.

use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::models::{PetLocation, SafeZone, ZoneMembership};
use crate::store::TrackingStore;

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Entered,
    Exited,
}

/// Pure transition function of the membership state machine.
pub fn classify_transition(was_inside: bool, is_inside: bool) -> Option<TransitionKind> {
    match (was_inside, is_inside) {
        (false, true) => Some(TransitionKind::Entered),
        (true, false) => Some(TransitionKind::Exited),
        _ => None,
    }
}

/// A detected membership change for one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTransition {
    pub zone: SafeZone,
    pub kind: TransitionKind,
    pub distance_meters: f64,
}

impl ZoneTransition {
    /// Whether the zone asked to be notified about this kind of change.
    pub fn should_notify(&self) -> bool {
        match self.kind {
            TransitionKind::Entered => self.zone.notifications.on_entry,
            TransitionKind::Exited => self.zone.notifications.on_exit,
        }
    }
}

/// Compares fixes against a pet's active safe zones.
#[derive(Clone)]
pub struct GeofenceEvaluator {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
}

impl GeofenceEvaluator {
    pub fn new(store: Arc<dyn TrackingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Evaluates `location` against every active zone of its pet.
    ///
    /// Returns all transitions, including ones the zone does not notify on.
    /// The new membership flag of every evaluated zone is persisted whether
    /// or not anything changed.
    pub async fn evaluate(&self, location: &PetLocation) -> Result<Vec<ZoneTransition>, StoreError> {
        let zones: Vec<SafeZone> = self
            .store
            .safe_zones()
            .await
            .into_iter()
            .filter(|z| z.pet_id == location.pet_id && z.is_active)
            .collect();

        if zones.is_empty() {
            return Ok(Vec::new());
        }

        let point = location.fix.coordinate();
        let now = self.clock.now();
        let mut memberships = self.store.zone_memberships().await;
        let mut transitions = Vec::new();

        for zone in zones {
            let distance = zone.distance_from_center(&point);
            let is_inside = distance <= zone.radius_meters;

            let existing = memberships
                .iter_mut()
                .find(|m| m.pet_id == location.pet_id && m.zone_id == zone.id);
            let was_inside = existing.as_ref().map(|m| m.inside).unwrap_or(false);

            match existing {
                Some(m) => {
                    m.inside = is_inside;
                    m.updated_at = now;
                }
                None => memberships.push(ZoneMembership {
                    pet_id: location.pet_id.clone(),
                    zone_id: zone.id,
                    inside: is_inside,
                    updated_at: now,
                }),
            }

            debug!(
                pet_id = %location.pet_id,
                zone_id = %zone.id,
                distance_m = distance,
                was_inside,
                is_inside,
                "Evaluated safe zone"
            );

            if let Some(kind) = classify_transition(was_inside, is_inside) {
                transitions.push(ZoneTransition {
                    zone,
                    kind,
                    distance_meters: distance,
                });
            }
        }

        self.store.save_zone_memberships(&memberships).await?;
        Ok(transitions)
    }

    /// Current persisted flag for a (pet, zone) pair; absent means outside.
    pub async fn is_inside(&self, pet_id: &str, zone_id: uuid::Uuid) -> bool {
        self.store
            .zone_memberships()
            .await
            .iter()
            .find(|m| m.pet_id == pet_id && m.zone_id == zone_id)
            .map(|m| m.inside)
            .unwrap_or(false)
    }
}
