use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::{AppConfig, AvailabilitySettings};

use crate::models::{AvailabilityError, AvailabilityFilter, AvailabilityResult};
use crate::services::engine::AvailabilitySnapshot;
use crate::services::horizon::{filter_days, horizon_end, month_days, rolling_days};
use crate::services::lookup::{
    BookingLookup, MedicalServiceLookup, ReceptionWindowLookup, SupabaseAvailabilityStore,
    VetLookup,
};
use crate::services::reception::group_windows_by_weekday;

/// Days before today whose bookings are still loaded, so overnight appointments are seen.
const BOOKING_LOOKBACK_DAYS: i64 = 1;

/// Answers availability queries for a vet's medical service.
///
/// Every query loads its data once, then computes against a snapshot frozen at the `now`
/// passed in by the caller.
pub struct AvailabilityService {
    services: Arc<dyn MedicalServiceLookup>,
    vets: Arc<dyn VetLookup>,
    windows: Arc<dyn ReceptionWindowLookup>,
    bookings: Arc<dyn BookingLookup>,
    settings: AvailabilitySettings,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        let store = Arc::new(SupabaseAvailabilityStore::new(config));
        Self {
            services: store.clone(),
            vets: store.clone(),
            windows: store.clone(),
            bookings: store,
            settings: config.availability.clamped(),
        }
    }

    pub fn with_lookups(
        services: Arc<dyn MedicalServiceLookup>,
        vets: Arc<dyn VetLookup>,
        windows: Arc<dyn ReceptionWindowLookup>,
        bookings: Arc<dyn BookingLookup>,
        settings: AvailabilitySettings,
    ) -> Self {
        Self { services, vets, windows, bookings, settings: settings.clamped() }
    }

    /// Free slots per day for a month (`0` = January), or the rolling horizon when `month` is `None`.
    pub async fn enumerate_month(
        &self,
        vet_id: Uuid,
        medical_service_id: Uuid,
        month: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityResult>, AvailabilityError> {
        debug!("Enumerating availability for vet {} service {} month {:?}", vet_id, medical_service_id, month);

        let days = month_days(now, month, horizon_end(now, self.settings.horizon_months))?;
        let Some(snapshot) = self.load_snapshot(vet_id, medical_service_id, now).await? else {
            return Ok(Vec::new());
        };

        let results = snapshot.enumerate(&days);
        debug!("Found {} available days", results.len());
        Ok(results)
    }

    /// The earliest day with a free slot within the horizon.
    pub async fn find_first(
        &self,
        vet_id: Uuid,
        medical_service_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AvailabilityResult>, AvailabilityError> {
        debug!("Finding first availability for vet {} service {}", vet_id, medical_service_id);

        let Some(snapshot) = self.load_snapshot(vet_id, medical_service_id, now).await? else {
            return Ok(None);
        };

        let days = rolling_days(now, snapshot.horizon());
        Ok(snapshot.find_first(&days))
    }

    /// Whether any slot is free in the days selected by `filter`.
    pub async fn exists_within_filter(
        &self,
        vet_id: Uuid,
        medical_service_id: Uuid,
        filter: AvailabilityFilter,
        now: DateTime<Utc>,
    ) -> Result<bool, AvailabilityError> {
        debug!("Checking {:?} availability for vet {} service {}", filter, vet_id, medical_service_id);

        let Some(snapshot) = self.load_snapshot(vet_id, medical_service_id, now).await? else {
            return Ok(false);
        };

        let days = filter_days(now, filter, snapshot.horizon());
        Ok(snapshot.any_available(&days))
    }

    /// Fetch everything a query needs. `None` means the vet has nothing to offer.
    async fn load_snapshot(
        &self,
        vet_id: Uuid,
        medical_service_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AvailabilitySnapshot>, AvailabilityError> {
        if !self.vets.vet_exists(vet_id).await? {
            return Err(AvailabilityError::NotFound(format!("Vet {} not found", vet_id)));
        }

        let service = self.services.find_service(medical_service_id).await?;
        if service.vet_id != vet_id {
            return Err(AvailabilityError::NotFound(format!(
                "Medical service {} not offered by vet {}",
                medical_service_id, vet_id
            )));
        }

        let duration_minutes = i64::from(service.duration_minutes);
        if duration_minutes <= 0 {
            warn!("Medical service {} has non-positive duration {}", service.id, duration_minutes);
            return Ok(None);
        }

        let windows = self.windows.find_windows_for(vet_id, service.specialization_id).await?;
        if windows.is_empty() {
            debug!("Vet {} has no reception hours for specialization {}", vet_id, service.specialization_id);
            return Ok(None);
        }

        // Bookings from the previous day may still run past midnight into today's slots.
        let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let bookings_from = start_of_today - Duration::days(BOOKING_LOOKBACK_DAYS);
        let bookings = self.bookings.find_future_bookings(medical_service_id, bookings_from).await?;

        Ok(Some(AvailabilitySnapshot::new(
            group_windows_by_weekday(&windows),
            bookings,
            duration_minutes,
            now,
            &self.settings,
        )))
    }
}
