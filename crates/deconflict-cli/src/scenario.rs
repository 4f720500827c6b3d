//! Scenario files: a set of scheduled flights plus one primary mission.

use anyhow::{Context, Result};
use deconflict_core::{
    DeconflictionRules, FlightRegistry, FlightRequest, Trajectory, ValidationReport,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scheduled traffic and the mission to check against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub scheduled: Vec<FlightRequest>,
    pub primary: FlightRequest,
}

impl Scenario {
    /// Load a scenario from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let mut scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scenario {}", path.display()))?;
        if scenario.name.is_empty() {
            scenario.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(scenario)
    }

    /// Registry holding every scheduled flight, in file order.
    pub fn registry(&self) -> Result<FlightRegistry> {
        let mut registry = FlightRegistry::new();
        for request in &self.scheduled {
            let trajectory = request
                .to_trajectory()
                .with_context(|| format!("scheduled flight {} is invalid", request.id))?;
            registry.add_flight(trajectory);
        }
        Ok(registry)
    }

    pub fn primary_trajectory(&self) -> Result<Trajectory> {
        self.primary
            .to_trajectory()
            .with_context(|| format!("primary mission {} is invalid", self.primary.id))
    }

    /// Build everything and run validation.
    pub fn validate(&self, rules: DeconflictionRules) -> Result<ValidationReport> {
        let registry = self.registry()?;
        let primary = self.primary_trajectory()?;
        let report = registry.validate_with_rules(&primary, rules)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deconflict_core::MissionStatus;

    const DEMO: &str = include_str!("../scenarios/demo.json");

    #[test]
    fn bundled_demo_file_conflicts_with_cargo_drone() {
        let scenario: Scenario = serde_json::from_str(DEMO).unwrap();
        assert_eq!(scenario.scheduled.len(), 2);

        let report = scenario
            .validate(DeconflictionRules::with_buffer(10.0))
            .unwrap();
        assert_eq!(report.status, MissionStatus::Conflict);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].other_id, "Drone_B_Cargo");
    }

    #[test]
    fn invalid_scheduled_flight_is_reported_by_id() {
        let mut scenario: Scenario = serde_json::from_str(DEMO).unwrap();
        scenario.scheduled[1].waypoints.truncate(1);

        let err = scenario.registry().unwrap_err();
        assert!(err.to_string().contains("Drone_C_Survey"));
    }

    #[test]
    fn missing_file_has_context() {
        let err = Scenario::from_path("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("failed to read scenario"));
    }
}
