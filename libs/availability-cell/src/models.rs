use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::calendar::Weekday;

// ==============================================================================
// RECEPTION HOURS
// ==============================================================================

/// One contiguous interval in which a vet receives patients on a given weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptionWindow {
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ReceptionWindow {
    pub fn new(weekday: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self { weekday, start_time, end_time }
    }
}

/// Reception hour row as stored: ISO weekday tag and free-form time text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptionHourRecord {
    pub id: Option<Uuid>,
    pub day_of_week: i32,
    pub hour_from: String,
    pub hour_to: String,
}

// ==============================================================================
// MEDICAL SERVICES & BOOKINGS
// ==============================================================================

/// A medical service as offered by one vet at one clinic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalServiceInfo {
    pub id: Uuid,
    pub vet_id: Uuid,
    pub specialization_id: Uuid,
    pub clinic_id: Uuid,
    pub duration_minutes: i32,
}

/// A booked appointment reduced to the interval it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingAppointment {
    pub start: DateTime<Utc>,
    pub occupied_minutes: i64,
}

impl ExistingAppointment {
    pub fn new(start: DateTime<Utc>, occupied_minutes: i64) -> Self {
        Self { start, occupied_minutes }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.occupied_minutes)
    }
}

// ==============================================================================
// QUERY TYPES
// ==============================================================================

/// Free slots found on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub slots: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityFilter {
    #[serde(rename = "TODAY")]
    Today,
    #[serde(rename = "WITHIN_3_DAYS")]
    WithinThreeDays,
    #[serde(rename = "WHENEVER")]
    Whenever,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed time of day: '{0}'")]
    MalformedTime(String),

    #[error("Invalid weekday index: {0}")]
    InvalidWeekday(i32),

    #[error("Invalid month: {0} (expected 0-11)")]
    InvalidMonth(u32),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] anyhow::Error),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        let message = err.to_string();
        match err {
            AvailabilityError::NotFound(msg) => AppError::NotFound(msg),
            AvailabilityError::InvalidMonth(_) => AppError::ValidationError(message),
            AvailabilityError::MalformedTime(_) | AvailabilityError::InvalidWeekday(_) => {
                AppError::BadRequest(message)
            }
            AvailabilityError::Lookup(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn appointment_end_adds_occupied_minutes() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let booking = ExistingAppointment::new(start, 45);
        assert_eq!(booking.end(), Utc.with_ymd_and_hms(2024, 3, 4, 10, 45, 0).unwrap());
    }

    #[test]
    fn filter_uses_wire_names() {
        let filter: AvailabilityFilter = serde_json::from_str("\"WITHIN_3_DAYS\"").unwrap();
        assert_eq!(filter, AvailabilityFilter::WithinThreeDays);
        assert_eq!(serde_json::to_string(&AvailabilityFilter::Today).unwrap(), "\"TODAY\"");
    }

    #[test]
    fn errors_map_to_http_errors() {
        assert_matches!(
            AppError::from(AvailabilityError::NotFound("vet".to_string())),
            AppError::NotFound(_)
        );
        assert_matches!(
            AppError::from(AvailabilityError::InvalidMonth(12)),
            AppError::ValidationError(_)
        );
        assert_matches!(
            AppError::from(AvailabilityError::Lookup(anyhow::anyhow!("timeout"))),
            AppError::Database(_)
        );
    }
}
