use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, AvailabilitySettings};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub availability: AvailabilitySettings,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            availability: AvailabilitySettings::default(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            port: 0,
            availability: self.availability,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Rows shaped like the PostgREST responses for the clinic tables.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn vet_response(vet_id: Uuid) -> serde_json::Value {
        json!({ "id": vet_id })
    }

    pub fn medical_service_response(
        service_id: Uuid,
        vet_id: Uuid,
        specialization_id: Uuid,
        duration_minutes: i32,
    ) -> serde_json::Value {
        json!({
            "id": service_id,
            "vet_id": vet_id,
            "specialization_id": specialization_id,
            "clinic_id": Uuid::new_v4(),
            "duration_minutes": duration_minutes
        })
    }

    /// `day_of_week` is the ISO index, Monday = 1.
    pub fn reception_hour_response(day_of_week: i32, hour_from: &str, hour_to: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "day_of_week": day_of_week,
            "hour_from": hour_from,
            "hour_to": hour_to
        })
    }

    pub fn booked_appointment_response(date: &str, duration_minutes: i32) -> serde_json::Value {
        json!({
            "date": date,
            "medical_service": { "duration_minutes": duration_minutes }
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
