use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AvailabilityFilter;
use crate::services::availability::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct AvailableDatesQuery {
    /// Zero-based month (0 = January).
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityExistsQuery {
    pub filter: AvailabilityFilter,
}

#[axum::debug_handler]
pub async fn get_available_dates(
    State(state): State<Arc<AppConfig>>,
    Path((vet_id, medical_service_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AvailableDatesQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let dates = availability_service
        .enumerate_month(vet_id, medical_service_id, query.month, Utc::now())
        .await?;

    Ok(Json(json!({
        "vet_id": vet_id,
        "medical_service_id": medical_service_id,
        "available_dates": dates,
        "total": dates.len()
    })))
}

#[axum::debug_handler]
pub async fn get_first_available_date(
    State(state): State<Arc<AppConfig>>,
    Path((vet_id, medical_service_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let first = availability_service
        .find_first(vet_id, medical_service_id, Utc::now())
        .await?;

    Ok(Json(json!({
        "vet_id": vet_id,
        "medical_service_id": medical_service_id,
        "first_available_date": first
    })))
}

#[axum::debug_handler]
pub async fn check_available_date_exists(
    State(state): State<Arc<AppConfig>>,
    Path((vet_id, medical_service_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AvailabilityExistsQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let exists = availability_service
        .exists_within_filter(vet_id, medical_service_id, query.filter, Utc::now())
        .await?;

    Ok(Json(json!({
        "vet_id": vet_id,
        "medical_service_id": medical_service_id,
        "filter": query.filter,
        "exists": exists
    })))
}
