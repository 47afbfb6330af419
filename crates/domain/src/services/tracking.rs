//! Tracking service.
//!
//! Entry point used by the HTTP layer and the background jobs. Owns the
//! write gate and runs the ingestion pipeline: produce a fix, store it as
//! the pet's latest location, then evaluate alerts against it.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::alerts::AlertEngine;
use super::ingestion::LocationSource;
use super::notification::NotificationSink;
use super::status::StatusAggregator;
use super::WriteGate;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::models::{
    Alert, ChipRecord, ChipStatus, ChipVerification, CreateSafeZoneRequest, LocationFix,
    PetLocation, RegisterChipRequest, SafeZone,
};
use crate::store::TrackingStore;

/// Maximum number of safe zones per pet.
pub const MAX_SAFE_ZONES_PER_PET: usize = 20;

/// Chip registered on first start when the store has no chips.
pub const DEMO_CHIP_CODE: &str = "CHIP-0000-0000-0001";

/// Result of running one fix through the pipeline.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub location: PetLocation,
    pub alerts: Vec<Alert>,
}

/// What happened to a device-reported fix.
#[derive(Debug, Clone)]
pub enum FixDisposition {
    /// Buffered by the location source until the next tick.
    Buffered,
    /// Ingested immediately.
    Recorded(IngestOutcome),
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub processed: usize,
    pub failed: usize,
    pub alerts: usize,
}

pub struct TrackingService {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
    source: Arc<dyn LocationSource>,
    alerts: AlertEngine,
    status: StatusAggregator,
    gate: WriteGate,
}

impl TrackingService {
    pub fn new(
        store: Arc<dyn TrackingStore>,
        clock: Arc<dyn Clock>,
        source: Arc<dyn LocationSource>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let gate = WriteGate::default();
        Self {
            alerts: AlertEngine::new(store.clone(), clock.clone(), sink, gate.clone()),
            status: StatusAggregator::new(store.clone(), clock.clone()),
            store,
            clock,
            source,
            gate,
        }
    }

    pub fn alerts(&self) -> &AlertEngine {
        &self.alerts
    }

    pub fn status(&self) -> &StatusAggregator {
        &self.status
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Current time according to the service clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Registers a chip for a pet.
    ///
    /// Verified chips start active and replace the pet's previous active chip.
    pub async fn register_chip(&self, request: RegisterChipRequest) -> Result<ChipRecord, DomainError> {
        request.validate()?;

        let _guard = self.gate.lock().await;
        let mut chips = self.store.chips().await;

        if chips.iter().any(|c| c.code == request.chip_code) {
            return Err(DomainError::Conflict(format!(
                "Chip {} is already registered",
                request.chip_code
            )));
        }

        if request.is_verified {
            deactivate_pet_chips(&mut chips, &request.pet_id);
        }

        let chip = ChipRecord {
            id: Uuid::new_v4(),
            code: request.chip_code,
            pet_id: request.pet_id,
            pet_name: request.pet_name,
            owner_id: request.owner_id,
            is_active: request.is_verified,
            registered_at: self.clock.now(),
            last_seen: None,
        };
        chips.push(chip.clone());
        self.store.save_chips(&chips).await?;

        info!(
            chip_id = %chip.id,
            pet_id = %chip.pet_id,
            is_active = chip.is_active,
            "Chip registered"
        );

        Ok(chip)
    }

    /// Activates a registered chip, deactivating the pet's other chips.
    pub async fn activate_chip(&self, code: &str) -> Result<ChipRecord, DomainError> {
        let _guard = self.gate.lock().await;
        let mut chips = self.store.chips().await;

        let pet_id = chips
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.pet_id.clone())
            .ok_or_else(|| DomainError::NotFound(format!("Chip {} is not registered", code)))?;

        deactivate_pet_chips(&mut chips, &pet_id);
        let chip = chips
            .iter_mut()
            .find(|c| c.code == code)
            .ok_or_else(|| DomainError::NotFound(format!("Chip {} is not registered", code)))?;
        chip.is_active = true;
        let activated = chip.clone();

        self.store.save_chips(&chips).await?;
        info!(chip_id = %activated.id, pet_id = %activated.pet_id, "Chip activated");
        Ok(activated)
    }

    /// Checks the format of a chip code and whether it is registered.
    pub async fn verify_chip_code(&self, code: &str) -> ChipVerification {
        if !shared::validation::is_valid_chip_code(code) {
            return ChipVerification {
                is_valid: false,
                is_registered: false,
            };
        }

        let is_registered = self.store.chips().await.iter().any(|c| c.code == code);
        ChipVerification {
            is_valid: true,
            is_registered,
        }
    }

    /// Latest location of every pet with an active chip.
    pub async fn pets_with_location(&self) -> Vec<PetLocation> {
        let chips = self.store.chips().await;
        self.store
            .locations()
            .await
            .into_iter()
            .filter(|l| chips.iter().any(|c| c.id == l.chip_id && c.is_active))
            .collect()
    }

    pub async fn chip_status(&self, pet_id: &str) -> Option<ChipStatus> {
        self.status.chip_status(pet_id).await
    }

    pub async fn create_safe_zone(&self, request: CreateSafeZoneRequest) -> Result<SafeZone, DomainError> {
        request.validate()?;

        let _guard = self.gate.lock().await;
        if !self.store.chips().await.iter().any(|c| c.pet_id == request.pet_id) {
            return Err(DomainError::NotFound(format!(
                "Pet {} has no registered chip",
                request.pet_id
            )));
        }

        let mut zones = self.store.safe_zones().await;
        let count = zones.iter().filter(|z| z.pet_id == request.pet_id).count();
        if count >= MAX_SAFE_ZONES_PER_PET {
            return Err(DomainError::Conflict(format!(
                "Pet already has the maximum of {} safe zones",
                MAX_SAFE_ZONES_PER_PET
            )));
        }

        let zone = SafeZone {
            id: Uuid::new_v4(),
            pet_id: request.pet_id,
            name: request.name,
            center_latitude: request.center_latitude,
            center_longitude: request.center_longitude,
            radius_meters: request.radius_meters,
            is_active: request.is_active,
            created_at: self.clock.now(),
            notifications: request.notifications,
        };
        zones.push(zone.clone());
        self.store.save_safe_zones(&zones).await?;

        info!(
            zone_id = %zone.id,
            pet_id = %zone.pet_id,
            radius_meters = zone.radius_meters,
            "Safe zone created"
        );

        Ok(zone)
    }

    /// Active safe zones of a pet.
    pub async fn safe_zones(&self, pet_id: &str) -> Vec<SafeZone> {
        self.store
            .safe_zones()
            .await
            .into_iter()
            .filter(|z| z.pet_id == pet_id && z.is_active)
            .collect()
    }

    /// Pulls a fix for the pet from the location source and ingests it.
    pub async fn simulate(&self, pet_id: &str) -> Result<IngestOutcome, DomainError> {
        let _guard = self.gate.lock().await;
        let chip = self.active_chip(pet_id).await?;
        let fix = self.source.produce_fix(pet_id).await?;
        self.ingest(chip, fix).await
    }

    /// Ingests a fix supplied by the caller.
    pub async fn record_fix(&self, pet_id: &str, fix: LocationFix) -> Result<IngestOutcome, DomainError> {
        let _guard = self.gate.lock().await;
        let chip = self.active_chip(pet_id).await?;
        self.ingest(chip, fix).await
    }

    /// Hands a device report to the location source, or ingests it directly
    /// when the source does not buffer reports.
    pub async fn report_fix(&self, pet_id: &str, fix: LocationFix) -> Result<FixDisposition, DomainError> {
        {
            let _guard = self.gate.lock().await;
            self.active_chip(pet_id).await?;
        }

        if self.source.offer(pet_id, &fix).await {
            debug!(pet_id, "Fix buffered for next tick");
            return Ok(FixDisposition::Buffered);
        }

        self.record_fix(pet_id, fix).await.map(FixDisposition::Recorded)
    }

    /// One tracking cycle over every active chip, one pet at a time.
    ///
    /// A failure for one pet is logged and does not stop the others.
    pub async fn tick(&self) -> TickSummary {
        let pet_ids: Vec<String> = self
            .store
            .chips()
            .await
            .into_iter()
            .filter(|c| c.is_active)
            .map(|c| c.pet_id)
            .collect();

        let mut summary = TickSummary::default();
        for pet_id in pet_ids {
            match self.simulate(&pet_id).await {
                Ok(outcome) => {
                    summary.processed += 1;
                    summary.alerts += outcome.alerts.len();
                }
                Err(DomainError::Ingest(e)) => {
                    debug!(pet_id = %pet_id, error = %e, "No fix this tick");
                    summary.failed += 1;
                }
                Err(e) => {
                    error!(pet_id = %pet_id, error = %e, "Tracking update failed");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Registers a demo chip when the store has none.
    pub async fn seed_demo_chip_if_empty(&self) -> Result<Option<ChipRecord>, DomainError> {
        if !self.store.chips().await.is_empty() {
            return Ok(None);
        }

        let chip = self
            .register_chip(RegisterChipRequest {
                chip_code: DEMO_CHIP_CODE.to_string(),
                pet_id: "demo-pet".to_string(),
                pet_name: "Max".to_string(),
                owner_id: "demo-owner".to_string(),
                is_verified: true,
            })
            .await?;
        Ok(Some(chip))
    }

    async fn active_chip(&self, pet_id: &str) -> Result<ChipRecord, DomainError> {
        self.store
            .chips()
            .await
            .into_iter()
            .find(|c| c.pet_id == pet_id && c.is_active)
            .ok_or_else(|| DomainError::NotFound(format!("Pet {} has no active chip", pet_id)))
    }

    /// Stores the fix as the pet's latest location and evaluates alerts.
    /// The caller must hold the write gate.
    async fn ingest(&self, chip: ChipRecord, fix: LocationFix) -> Result<IngestOutcome, DomainError> {
        let location = PetLocation {
            pet_id: chip.pet_id.clone(),
            pet_name: chip.pet_name.clone(),
            chip_id: chip.id,
            fix,
        };

        let mut locations = self.store.locations().await;
        locations.retain(|l| l.pet_id != location.pet_id);
        locations.push(location.clone());
        self.store.save_locations(&locations).await?;

        let mut chips = self.store.chips().await;
        if let Some(stored) = chips.iter_mut().find(|c| c.id == chip.id) {
            stored.last_seen = Some(location.fix.timestamp);
            self.store.save_chips(&chips).await?;
        } else {
            warn!(chip_id = %chip.id, "Chip disappeared during ingestion");
        }

        debug!(
            pet_id = %location.pet_id,
            latitude = location.fix.latitude,
            longitude = location.fix.longitude,
            battery = location.fix.battery_percent,
            "Location updated"
        );

        let alerts = self.alerts.evaluate(&location).await?;
        Ok(IngestOutcome { location, alerts })
    }
}

fn deactivate_pet_chips(chips: &mut [ChipRecord], pet_id: &str) {
    for chip in chips.iter_mut().filter(|c| c.pet_id == pet_id && c.is_active) {
        chip.is_active = false;
        info!(chip_id = %chip.id, pet_id, "Previous chip deactivated");
    }
}
