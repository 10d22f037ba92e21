use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/{vet_id}/medical-services/{medical_service_id}/available-dates",
            get(handlers::get_available_dates),
        )
        .route(
            "/{vet_id}/medical-services/{medical_service_id}/first-available-date",
            get(handlers::get_first_available_date),
        )
        .route(
            "/{vet_id}/medical-services/{medical_service_id}/available-date-exists",
            get(handlers::check_available_date_exists),
        )
        .with_state(state)
}
