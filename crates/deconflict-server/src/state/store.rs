//! In-memory state: the shared flight registry plus validation history.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use deconflict_core::{
    ConflictDetector, ConflictRecord, DeconflictionRules, DetectionStrategy, MissionStatus, Result,
    SharedRegistry, Trajectory, ValidationReport,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;

/// Stored outcome of one mission validation.
#[derive(Debug, Clone, Serialize)]
pub struct MissionResult {
    pub mission_id: String,
    pub primary_id: String,
    pub status: MissionStatus,
    pub conflicts: Vec<ConflictRecord>,
    /// Number of scheduled flights in the snapshot that was checked
    pub checked_flights: usize,
    pub spatial_buffer_m: f64,
    pub sample_step_s: f64,
    pub strategy: DetectionStrategy,
    pub validated_at: DateTime<Utc>,
    /// Insertion order; orders results stored within the same clock tick
    #[serde(skip)]
    sequence: u64,
}

/// Application state - thread-safe registry and mission history.
///
/// The history keeps at most `config.mission_history` results; the oldest
/// are evicted first.
pub struct AppState {
    registry: SharedRegistry,
    missions: DashMap<String, MissionResult>,
    next_sequence: AtomicU64,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            registry: SharedRegistry::new(),
            missions: DashMap::new(),
            next_sequence: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Schedule a flight. Returns the number of registered flights.
    pub fn register_flight(&self, trajectory: Arc<Trajectory>) -> usize {
        self.registry.add_flight(trajectory);
        self.registry.len()
    }

    /// Registered flights in registration order.
    pub fn get_flights(&self) -> Vec<Arc<Trajectory>> {
        self.registry.snapshot()
    }

    /// Validate a mission against the current schedule and record the result.
    ///
    /// CPU-bound; callers on the async runtime should run it on a blocking thread.
    pub fn validate_mission(
        &self,
        primary: &Trajectory,
        rules: DeconflictionRules,
    ) -> Result<MissionResult> {
        let detector = ConflictDetector::new(rules)?;
        let flights = self.registry.snapshot();
        let ValidationReport { status, conflicts } =
            detector.validate(primary, flights.iter().map(Arc::as_ref))?;

        let result = MissionResult {
            mission_id: Uuid::new_v4().to_string(),
            primary_id: primary.id().to_string(),
            status,
            conflicts,
            checked_flights: flights.len(),
            spatial_buffer_m: rules.spatial_buffer_m,
            sample_step_s: rules.sample_step_s,
            strategy: rules.strategy,
            validated_at: Utc::now(),
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };
        self.missions.insert(result.mission_id.clone(), result.clone());
        self.evict_old_missions();
        Ok(result)
    }

    fn evict_old_missions(&self) {
        let limit = self.config.mission_history;
        while self.missions.len() > limit {
            let oldest = self
                .missions
                .iter()
                .min_by_key(|r| r.value().sequence)
                .map(|r| r.key().clone());
            match oldest {
                Some(mission_id) => {
                    self.missions.remove(&mission_id);
                    tracing::debug!("Evicted mission result {}", mission_id);
                }
                None => break,
            }
        }
    }

    pub fn get_mission(&self, mission_id: &str) -> Option<MissionResult> {
        self.missions.get(mission_id).map(|r| r.value().clone())
    }

    /// All stored results, newest first.
    pub fn get_missions(&self) -> Vec<MissionResult> {
        let mut missions: Vec<MissionResult> =
            self.missions.iter().map(|r| r.value().clone()).collect();
        missions.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        missions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use deconflict_core::Waypoint;

    fn state(history: usize) -> AppState {
        let mut config = Config::from_lookup(|_| None);
        config.mission_history = history;
        AppState::new(config)
    }

    fn primary(id: &str) -> Trajectory {
        Trajectory::new(
            id,
            vec![Waypoint::new(50.0, 0.0, 20.0), Waypoint::new(50.0, 100.0, 20.0)],
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            5.0,
        )
        .unwrap()
    }

    #[test]
    fn missions_listed_in_insertion_order_newest_first() {
        let state = state(100);
        for id in ["first", "second", "third"] {
            state
                .validate_mission(&primary(id), DeconflictionRules::default())
                .unwrap();
        }

        let ids: Vec<String> = state.get_missions().into_iter().map(|m| m.primary_id).collect();
        assert_eq!(ids, vec!["third", "second", "first"]);
    }

    #[test]
    fn history_evicts_oldest_results() {
        let state = state(2);
        let first = state
            .validate_mission(&primary("first"), DeconflictionRules::default())
            .unwrap();
        for id in ["second", "third"] {
            state
                .validate_mission(&primary(id), DeconflictionRules::default())
                .unwrap();
        }

        assert_eq!(state.get_missions().len(), 2);
        assert!(state.get_mission(&first.mission_id).is_none());
        assert_eq!(state.get_missions()[0].primary_id, "third");
    }
}
