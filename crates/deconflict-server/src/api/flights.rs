//! Scheduled flight registration.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use deconflict_core::{FlightRequest, Trajectory};
use serde::Serialize;
use std::sync::Arc;

use crate::api::{unprocessable, ApiError};
use crate::state::AppState;

/// Registered flight as reported by the API.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub speed_mps: f64,
    pub total_duration_s: f64,
    pub total_distance_m: f64,
    pub waypoint_count: usize,
}

impl From<&Trajectory> for FlightSummary {
    fn from(trajectory: &Trajectory) -> Self {
        Self {
            id: trajectory.id().to_string(),
            start_time: trajectory.start_time(),
            end_time: trajectory.end_time(),
            speed_mps: trajectory.speed_mps(),
            total_duration_s: trajectory.total_duration(),
            total_distance_m: trajectory.total_distance(),
            waypoint_count: trajectory.waypoints().len(),
        }
    }
}

/// Add a flight to the schedule. No conflict check is made here.
pub async fn register_flight(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FlightRequest>,
) -> Result<(StatusCode, Json<FlightSummary>), ApiError> {
    let trajectory = payload.to_trajectory().map_err(|err| {
        tracing::warn!("Rejected flight {}: {}", payload.id, err);
        unprocessable("Flight rejected", &err)
    })?;

    let summary = FlightSummary::from(&trajectory);
    let registered = state.register_flight(Arc::new(trajectory));
    tracing::info!(
        "Registered flight {} ({:.1}s, {} flights scheduled)",
        summary.id,
        summary.total_duration_s,
        registered
    );

    Ok((StatusCode::CREATED, Json(summary)))
}

/// List scheduled flights in registration order.
pub async fn list_flights(State(state): State<Arc<AppState>>) -> Json<Vec<FlightSummary>> {
    let flights = state.get_flights();
    Json(flights.iter().map(|f| FlightSummary::from(f.as_ref())).collect())
}
