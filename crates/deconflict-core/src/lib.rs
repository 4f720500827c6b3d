pub mod conflict;
pub mod error;
pub mod models;
pub mod registry;
pub mod rules;
pub mod spatial;
pub mod trajectory;

pub use conflict::{sample_times, time_offset_s, ConflictDetector, MAX_SAMPLES};
pub use error::{DeconflictError, Result, TrajectoryDefect};
pub use models::{
    ConflictRecord, FlightRequest, MissionStatus, Position, ValidationReport, Waypoint,
    DEFAULT_SPEED_MPS,
};
pub use registry::{FlightRegistry, SharedRegistry};
pub use rules::{DeconflictionRules, DetectionStrategy};
pub use trajectory::{Presence, Trajectory};
