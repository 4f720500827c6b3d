//! API routes for the deconfliction server.

pub mod flights;
pub mod missions;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use deconflict_core::DeconflictError;
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

/// Error response shared by all handlers.
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// Create the API router.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/flights", post(flights::register_flight))
        .route("/v1/flights", get(flights::list_flights))
        .route("/v1/missions", get(missions::list_missions))
        .route("/v1/missions/validate", post(missions::validate_mission))
        .route("/v1/missions/:mission_id", get(missions::get_mission))
}

pub(crate) fn unprocessable(message: &str, err: &DeconflictError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": message,
            "detail": err.to_string()
        })),
    )
}
