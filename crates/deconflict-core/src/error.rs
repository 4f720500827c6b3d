//! Error types for trajectory construction and mission validation.

use std::fmt;
use thiserror::Error;

/// Why a trajectory could not be built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrajectoryDefect {
    /// Fewer than two waypoints were supplied.
    TooFewWaypoints(usize),
    /// Speed was zero or negative.
    NonPositiveSpeed(f64),
    /// Speed was NaN or infinite.
    NonFiniteSpeed(f64),
    /// A waypoint coordinate was NaN or infinite (index of the waypoint).
    NonFiniteCoordinate(usize),
    /// The flight would land outside the representable calendar range
    /// (flight duration in seconds).
    DurationOutOfRange(f64),
}

impl fmt::Display for TrajectoryDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrajectoryDefect::TooFewWaypoints(count) => {
                write!(f, "at least 2 waypoints are required, got {}", count)
            }
            TrajectoryDefect::NonPositiveSpeed(speed) => {
                write!(f, "speed must be positive, got {}", speed)
            }
            TrajectoryDefect::NonFiniteSpeed(speed) => {
                write!(f, "speed must be finite, got {}", speed)
            }
            TrajectoryDefect::NonFiniteCoordinate(index) => {
                write!(f, "waypoint {} has a non-finite coordinate", index)
            }
            TrajectoryDefect::DurationOutOfRange(duration_s) => {
                write!(
                    f,
                    "flight duration of {}s lands outside the supported time range",
                    duration_s
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeconflictError {
    #[error("invalid trajectory '{id}': {reason}")]
    InvalidTrajectory {
        id: String,
        reason: TrajectoryDefect,
    },

    /// A validation parameter (buffer, sample step) was not a positive finite number.
    #[error("invalid rule '{field}': expected a positive finite value, got {value}")]
    InvalidRules { field: &'static str, value: f64 },

    /// Sampling the primary at the requested step would exceed the per-mission limit.
    #[error(
        "sampling '{id}' over {duration_s}s every {step_s}s needs more than {max} samples"
    )]
    TooManySamples {
        id: String,
        duration_s: f64,
        step_s: f64,
        max: u64,
    },
}

impl DeconflictError {
    pub(crate) fn trajectory(id: &str, reason: TrajectoryDefect) -> Self {
        Self::InvalidTrajectory {
            id: id.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeconflictError>;
