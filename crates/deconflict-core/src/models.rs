//! Core data models for the deconfliction authority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::trajectory::Trajectory;

/// Cruise speed assumed when a flight request does not state one.
pub const DEFAULT_SPEED_MPS: f64 = 5.0;

/// A point in local Cartesian space (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaypointRepr")]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    /// Altitude
    pub z: f64,
}

/// Positions share the waypoint representation.
pub type Position = Waypoint;

/// Accepts either `[x, y, z]` or `{"x": .., "y": .., "z": ..}` on input.
#[derive(Deserialize)]
#[serde(untagged)]
enum WaypointRepr {
    Array([f64; 3]),
    Object { x: f64, y: f64, z: f64 },
}

impl From<WaypointRepr> for Waypoint {
    fn from(repr: WaypointRepr) -> Self {
        match repr {
            WaypointRepr::Array([x, y, z]) => Waypoint { x, y, z },
            WaypointRepr::Object { x, y, z } => Waypoint { x, y, z },
        }
    }
}

impl Waypoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Straight-line distance to another point.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        crate::spatial::euclidean_distance(self, other)
    }
}

impl From<[f64; 3]> for Waypoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Waypoint {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// A flight submitted for registration or validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRequest {
    pub id: String,
    pub waypoints: Vec<Waypoint>,
    /// Scheduled takeoff instant
    pub start_time: DateTime<Utc>,
    #[serde(default = "default_speed")]
    pub speed_mps: f64,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_MPS
}

impl FlightRequest {
    pub fn new(
        id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        start_time: DateTime<Utc>,
        speed_mps: f64,
    ) -> Self {
        Self {
            id: id.into(),
            waypoints,
            start_time,
            speed_mps,
        }
    }

    /// Build the trajectory this request describes.
    pub fn to_trajectory(&self) -> Result<Trajectory> {
        Trajectory::new(
            self.id.clone(),
            self.waypoints.clone(),
            self.start_time,
            self.speed_mps,
        )
    }
}

/// Outcome of validating a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    /// No registered flight comes within the spatial buffer
    Clear,
    /// At least one registered flight breaches the spatial buffer
    Conflict,
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionStatus::Clear => write!(f, "CLEAR"),
            MissionStatus::Conflict => write!(f, "CONFLICT"),
        }
    }
}

/// A detected separation breach against one registered flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub other_id: String,
    /// Seconds since the primary's start, rounded to 2 decimals
    pub relative_time_s: f64,
    /// Primary's position at the breach
    pub location: Position,
    /// Separation at the breach, rounded to 2 decimals
    pub distance_m: f64,
}

/// Verdict plus one record per conflicting flight, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: MissionStatus,
    pub conflicts: Vec<ConflictRecord>,
}

impl ValidationReport {
    pub fn from_conflicts(conflicts: Vec<ConflictRecord>) -> Self {
        let status = if conflicts.is_empty() {
            MissionStatus::Clear
        } else {
            MissionStatus::Conflict
        };
        Self { status, conflicts }
    }

    pub fn clear() -> Self {
        Self::from_conflicts(Vec::new())
    }

    pub fn is_clear(&self) -> bool {
        self.status == MissionStatus::Clear
    }

    /// Record reported against a specific flight, if any.
    pub fn conflict_with(&self, other_id: &str) -> Option<&ConflictRecord> {
        self.conflicts.iter().find(|c| c.other_id == other_id)
    }
}
