//! Path export for external plotting tools.
//!
//! Each flight is sampled at evenly spaced instants over its own timeline
//! and written with the conflict markers as a single JSON document.

use anyhow::{Context, Result};
use deconflict_core::{FlightRegistry, Position, Trajectory, ValidationReport};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Samples per flight in the exported paths.
pub const DEFAULT_PATH_SAMPLES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightRole {
    Primary,
    Scheduled,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedPath {
    pub id: String,
    pub role: FlightRole,
    /// Whether this scheduled flight conflicts with the primary
    pub conflicting: bool,
    pub path: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictMarker {
    pub other_id: String,
    pub relative_time_s: f64,
    pub location: [f64; 3],
    pub distance_m: f64,
}

/// Everything a plotter needs to draw the scenario.
#[derive(Debug, Clone, Serialize)]
pub struct PathExport {
    pub title: String,
    pub axes: [&'static str; 3],
    pub flights: Vec<ExportedPath>,
    pub conflicts: Vec<ConflictMarker>,
}

impl PathExport {
    pub fn build(
        title: impl Into<String>,
        primary: &Trajectory,
        registry: &FlightRegistry,
        report: &ValidationReport,
        samples: usize,
    ) -> Self {
        let mut flights = vec![exported(primary, FlightRole::Primary, false, samples)];
        flights.extend(registry.iter().map(|flight| {
            let conflicting = report.conflict_with(flight.id()).is_some();
            exported(flight, FlightRole::Scheduled, conflicting, samples)
        }));

        let conflicts = report
            .conflicts
            .iter()
            .map(|c| ConflictMarker {
                other_id: c.other_id.clone(),
                relative_time_s: c.relative_time_s,
                location: c.location.to_array(),
                distance_m: c.distance_m,
            })
            .collect();

        Self {
            title: title.into(),
            axes: ["X (m)", "Y (m)", "Altitude (m)"],
            flights,
            conflicts,
        }
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

fn exported(
    trajectory: &Trajectory,
    role: FlightRole,
    conflicting: bool,
    samples: usize,
) -> ExportedPath {
    ExportedPath {
        id: trajectory.id().to_string(),
        role,
        conflicting,
        path: trajectory
            .sample_path(samples)
            .into_iter()
            .map(Position::to_array)
            .collect(),
    }
}
