use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AvailabilityError, ExistingAppointment, MedicalServiceInfo, ReceptionHourRecord,
    ReceptionWindow,
};
use crate::services::reception::windows_from_records;

#[async_trait]
pub trait MedicalServiceLookup: Send + Sync {
    /// Fails with `NotFound` when the service does not exist.
    async fn find_service(&self, medical_service_id: Uuid) -> Result<MedicalServiceInfo, AvailabilityError>;

    async fn find_duration(&self, medical_service_id: Uuid) -> Result<i64, AvailabilityError> {
        let service = self.find_service(medical_service_id).await?;
        Ok(i64::from(service.duration_minutes))
    }
}

#[async_trait]
pub trait VetLookup: Send + Sync {
    async fn vet_exists(&self, vet_id: Uuid) -> Result<bool, AvailabilityError>;
}

#[async_trait]
pub trait ReceptionWindowLookup: Send + Sync {
    async fn find_windows_for(
        &self,
        vet_id: Uuid,
        specialization_id: Uuid,
    ) -> Result<Vec<ReceptionWindow>, AvailabilityError>;
}

#[async_trait]
pub trait BookingLookup: Send + Sync {
    /// Active bookings of `medical_service_id` starting at or after `after`.
    async fn find_future_bookings(
        &self,
        medical_service_id: Uuid,
        after: DateTime<Utc>,
    ) -> Result<Vec<ExistingAppointment>, AvailabilityError>;
}

// ==============================================================================
// SUPABASE-BACKED LOOKUPS
// ==============================================================================

#[derive(Debug, Deserialize)]
struct ServiceDurationRow {
    duration_minutes: i32,
}

#[derive(Debug, Deserialize)]
struct BookedAppointmentRow {
    date: DateTime<Utc>,
    medical_service: ServiceDurationRow,
}

/// Reads vets, services, reception hours and appointments through PostgREST.
#[derive(Clone)]
pub struct SupabaseAvailabilityStore {
    supabase: SupabaseClient,
}

impl SupabaseAvailabilityStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl MedicalServiceLookup for SupabaseAvailabilityStore {
    async fn find_service(&self, medical_service_id: Uuid) -> Result<MedicalServiceInfo, AvailabilityError> {
        let path = format!(
            "/rest/v1/vet_medical_services?id=eq.{}&select=id,vet_id,specialization_id,clinic_id,duration_minutes",
            medical_service_id
        );

        let mut services: Vec<MedicalServiceInfo> = self.supabase.select(&path).await?;
        if services.is_empty() {
            return Err(AvailabilityError::NotFound(format!(
                "Medical service {} not found",
                medical_service_id
            )));
        }

        Ok(services.swap_remove(0))
    }
}

#[async_trait]
impl VetLookup for SupabaseAvailabilityStore {
    async fn vet_exists(&self, vet_id: Uuid) -> Result<bool, AvailabilityError> {
        let path = format!("/rest/v1/vets?id=eq.{}&select=id", vet_id);
        let rows: Vec<Value> = self.supabase.select(&path).await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl ReceptionWindowLookup for SupabaseAvailabilityStore {
    async fn find_windows_for(
        &self,
        vet_id: Uuid,
        specialization_id: Uuid,
    ) -> Result<Vec<ReceptionWindow>, AvailabilityError> {
        let path = format!(
            "/rest/v1/vet_reception_hours?vet_id=eq.{}&specialization_id=eq.{}&select=id,day_of_week,hour_from,hour_to&order=day_of_week.asc,hour_from.asc",
            vet_id, specialization_id
        );

        let records: Vec<ReceptionHourRecord> = self.supabase.select(&path).await?;
        let windows = windows_from_records(&records);
        debug!("Loaded {} of {} reception hours for vet {}", windows.len(), records.len(), vet_id);

        Ok(windows)
    }
}

#[async_trait]
impl BookingLookup for SupabaseAvailabilityStore {
    async fn find_future_bookings(
        &self,
        medical_service_id: Uuid,
        after: DateTime<Utc>,
    ) -> Result<Vec<ExistingAppointment>, AvailabilityError> {
        let path = format!(
            "/rest/v1/appointments?medical_service_id=eq.{}&date=gte.{}&status=neq.cancelled&select=date,medical_service:vet_medical_services(duration_minutes)&order=date.asc",
            medical_service_id,
            after.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let rows: Vec<BookedAppointmentRow> = self.supabase.select(&path).await?;

        Ok(rows
            .into_iter()
            .map(|row| ExistingAppointment::new(row.date, i64::from(row.medical_service.duration_minutes)))
            .collect())
    }
}
