//! Mission validation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use deconflict_core::{DeconflictionRules, DetectionStrategy, FlightRequest, MissionStatus};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::{unprocessable, ApiError};
use crate::state::{AppState, MissionResult};

#[derive(Debug, Deserialize)]
pub struct ValidateMissionRequest {
    pub mission: FlightRequest,
    /// Overrides the configured buffer for this request
    #[serde(default)]
    pub spatial_buffer_m: Option<f64>,
    #[serde(default)]
    pub sample_step_s: Option<f64>,
    #[serde(default)]
    pub strategy: Option<DetectionStrategy>,
}

impl ValidateMissionRequest {
    fn rules(&self, defaults: DeconflictionRules) -> DeconflictionRules {
        DeconflictionRules {
            spatial_buffer_m: self.spatial_buffer_m.unwrap_or(defaults.spatial_buffer_m),
            sample_step_s: self.sample_step_s.unwrap_or(defaults.sample_step_s),
            strategy: self.strategy.unwrap_or(defaults.strategy),
            ..defaults
        }
    }
}

/// Validate a candidate mission against every scheduled flight.
pub async fn validate_mission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateMissionRequest>,
) -> Result<Json<MissionResult>, ApiError> {
    let rules = payload.rules(state.config().rules);
    let primary = payload.mission.to_trajectory().map_err(|err| {
        tracing::warn!("Rejected mission {}: {}", payload.mission.id, err);
        unprocessable("Mission rejected", &err)
    })?;

    let worker = state.clone();
    let result = tokio::task::spawn_blocking(move || worker.validate_mission(&primary, rules))
        .await
        .map_err(|err| {
            tracing::error!("Validation task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Validation failed"
                })),
            )
        })?
        .map_err(|err| unprocessable("Invalid validation parameters", &err))?;

    match result.status {
        MissionStatus::Clear => tracing::info!(
            "Mission {} CLEAR against {} flight(s)",
            result.primary_id,
            result.checked_flights
        ),
        MissionStatus::Conflict => {
            for conflict in &result.conflicts {
                tracing::warn!(
                    "Mission {} conflicts with {} at {}s (separation {}m)",
                    result.primary_id,
                    conflict.other_id,
                    conflict.relative_time_s,
                    conflict.distance_m
                );
            }
        }
    }

    Ok(Json(result))
}

/// Get a stored validation result.
pub async fn get_mission(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
) -> Result<Json<MissionResult>, StatusCode> {
    state
        .get_mission(&mission_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// List stored validation results, newest first.
pub async fn list_missions(State(state): State<Arc<AppState>>) -> Json<Vec<MissionResult>> {
    Json(state.get_missions())
}
