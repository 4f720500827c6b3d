//! Time-parameterized flight paths.
//!
//! A [`Trajectory`] turns an ordered waypoint list, a takeoff instant and a
//! constant cruise speed into a position function over the flight's own
//! timeline. Timing tables are computed once at construction; queries only
//! search them.

use chrono::{DateTime, Duration, Utc};

use crate::error::{DeconflictError, Result, TrajectoryDefect};
use crate::models::{Position, Waypoint};
use crate::spatial::{cumulative_distances, lerp};

/// Result of a position query on a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    /// The flight is airborne at the queried time
    Present(Position),
    /// The queried time is before takeoff or after the final waypoint
    Absent,
}

impl Presence {
    pub fn position(self) -> Option<Position> {
        match self {
            Presence::Present(position) => Some(position),
            Presence::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }
}

/// An immutable constant-speed flight path.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    id: String,
    waypoints: Vec<Waypoint>,
    start_time: DateTime<Utc>,
    speed_mps: f64,
    /// Arc length from the first waypoint to each waypoint
    distances: Vec<f64>,
    /// Seconds after takeoff at which each waypoint is reached
    arrival_times: Vec<f64>,
    end_time: DateTime<Utc>,
}

impl Trajectory {
    /// Build a trajectory, rejecting fewer than 2 waypoints, non-finite
    /// coordinates, speeds that are not positive and finite, and flights
    /// whose landing instant cannot be represented.
    pub fn new(
        id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        start_time: DateTime<Utc>,
        speed_mps: f64,
    ) -> Result<Self> {
        let id = id.into();

        if waypoints.len() < 2 {
            return Err(DeconflictError::trajectory(
                &id,
                TrajectoryDefect::TooFewWaypoints(waypoints.len()),
            ));
        }
        if speed_mps.is_nan() || speed_mps == f64::INFINITY {
            return Err(DeconflictError::trajectory(
                &id,
                TrajectoryDefect::NonFiniteSpeed(speed_mps),
            ));
        }
        if speed_mps <= 0.0 {
            return Err(DeconflictError::trajectory(
                &id,
                TrajectoryDefect::NonPositiveSpeed(speed_mps),
            ));
        }
        if let Some(index) = waypoints.iter().position(|wp| !wp.is_finite()) {
            return Err(DeconflictError::trajectory(
                &id,
                TrajectoryDefect::NonFiniteCoordinate(index),
            ));
        }

        let distances = cumulative_distances(&waypoints);
        let arrival_times: Vec<f64> = distances.iter().map(|d| d / speed_mps).collect();

        let duration_s = arrival_times.last().copied().unwrap_or(0.0);
        let end_time = landing_time(start_time, duration_s).ok_or_else(|| {
            DeconflictError::trajectory(&id, TrajectoryDefect::DurationOutOfRange(duration_s))
        })?;

        Ok(Self {
            id,
            waypoints,
            start_time,
            speed_mps,
            distances,
            arrival_times,
            end_time,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn cumulative_distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    /// Path length in meters.
    pub fn total_distance(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Seconds from takeoff to the final waypoint.
    pub fn total_duration(&self) -> f64 {
        self.arrival_times.last().copied().unwrap_or(0.0)
    }

    /// Absolute instant the final waypoint is reached.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Position `relative_time_s` seconds after takeoff.
    ///
    /// Returns [`Presence::Absent`] outside `[0, total_duration]` (and for
    /// NaN); the path is never extrapolated.
    pub fn position_at(&self, relative_time_s: f64) -> Presence {
        let t = relative_time_s;
        if !(0.0..=self.total_duration()).contains(&t) {
            return Presence::Absent;
        }

        // Index of the last waypoint reached at or before t.
        let reached = self.arrival_times.partition_point(|&arrival| arrival <= t);
        let i = reached.saturating_sub(1);

        if self.arrival_times[i] == t || i + 1 >= self.waypoints.len() {
            return Presence::Present(self.waypoints[i]);
        }

        let (t0, t1) = (self.arrival_times[i], self.arrival_times[i + 1]);
        let span = t1 - t0;
        if span <= 0.0 {
            // Zero-length segment: the flight holds position.
            return Presence::Present(self.waypoints[i]);
        }

        let ratio = (t - t0) / span;
        Presence::Present(lerp(&self.waypoints[i], &self.waypoints[i + 1], ratio))
    }

    /// `count` evenly spaced positions from takeoff to the final waypoint
    /// inclusive, for plotting.
    pub fn sample_path(&self, count: usize) -> Vec<Position> {
        match count {
            0 => Vec::new(),
            1 => vec![self.waypoints[0]],
            _ => {
                let duration = self.total_duration();
                let last = (count - 1) as f64;
                (0..count)
                    .filter_map(|k| {
                        let t = if k == count - 1 {
                            duration
                        } else {
                            duration * k as f64 / last
                        };
                        self.position_at(t).position()
                    })
                    .collect()
            }
        }
    }
}

/// `start + duration_s`, or `None` when the sum leaves chrono's range.
fn landing_time(start: DateTime<Utc>, duration_s: f64) -> Option<DateTime<Utc>> {
    let micros = (duration_s * 1_000_000.0).round();
    if !micros.is_finite() || micros >= i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(Duration::microseconds(micros as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EPS: f64 = 1e-9;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn assert_close(a: Position, b: Position) {
        assert!(
            a.distance_to(&b) < EPS,
            "expected {b}, got {a}"
        );
    }

    fn l_shaped() -> Trajectory {
        Trajectory::new(
            "L",
            vec![
                Waypoint::new(0.0, 0.0, 10.0),
                Waypoint::new(30.0, 0.0, 10.0),
                Waypoint::new(30.0, 40.0, 10.0),
            ],
            t0(),
            10.0,
        )
        .unwrap()
    }

    #[test]
    fn timing_tables_computed_at_construction() {
        let traj = l_shaped();
        assert_eq!(traj.cumulative_distances(), &[0.0, 30.0, 70.0]);
        assert_eq!(traj.arrival_times(), &[0.0, 3.0, 7.0]);
        assert_eq!(traj.total_duration(), 7.0);
        assert_eq!(traj.total_distance(), 70.0);
        assert_eq!(traj.end_time(), t0() + Duration::seconds(7));
    }

    #[test]
    fn interpolates_within_segments() {
        let traj = l_shaped();
        assert_close(
            traj.position_at(1.5).position().unwrap(),
            Waypoint::new(15.0, 0.0, 10.0),
        );
        assert_close(
            traj.position_at(5.0).position().unwrap(),
            Waypoint::new(30.0, 20.0, 10.0),
        );
    }

    #[test]
    fn arrival_times_reproduce_waypoints() {
        let traj = l_shaped();
        for (arrival, waypoint) in traj.arrival_times().iter().zip(traj.waypoints()) {
            assert_eq!(traj.position_at(*arrival), Presence::Present(*waypoint));
        }
    }

    #[test]
    fn absent_outside_window() {
        let traj = l_shaped();
        assert_eq!(traj.position_at(-0.001), Presence::Absent);
        assert_eq!(traj.position_at(7.001), Presence::Absent);
        assert_eq!(traj.position_at(f64::NAN), Presence::Absent);
        assert!(traj.position_at(0.0).is_present());
        assert!(traj.position_at(7.0).is_present());
    }

    #[test]
    fn zero_length_segment_holds_position() {
        let hover = Waypoint::new(10.0, 0.0, 5.0);
        let traj = Trajectory::new(
            "hover",
            vec![Waypoint::new(0.0, 0.0, 5.0), hover, hover, Waypoint::new(20.0, 0.0, 5.0)],
            t0(),
            5.0,
        )
        .unwrap();
        assert_eq!(traj.arrival_times(), &[0.0, 2.0, 2.0, 4.0]);
        assert_eq!(traj.position_at(2.0), Presence::Present(hover));
        assert_close(
            traj.position_at(3.0).position().unwrap(),
            Waypoint::new(15.0, 0.0, 5.0),
        );
    }

    #[test]
    fn fully_coincident_path_is_instantaneous() {
        let point = Waypoint::new(1.0, 2.0, 3.0);
        let traj = Trajectory::new("static", vec![point, point], t0(), 5.0).unwrap();
        assert_eq!(traj.total_duration(), 0.0);
        assert_eq!(traj.position_at(0.0), Presence::Present(point));
        assert_eq!(traj.position_at(0.1), Presence::Absent);
    }

    #[test]
    fn rejects_invalid_construction() {
        let one = vec![Waypoint::new(0.0, 0.0, 0.0)];
        let two = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(1.0, 0.0, 0.0)];

        let err = Trajectory::new("a", one, t0(), 5.0).unwrap_err();
        assert_eq!(
            err,
            DeconflictError::InvalidTrajectory {
                id: "a".to_string(),
                reason: TrajectoryDefect::TooFewWaypoints(1),
            }
        );

        for speed in [0.0, -1.0, f64::NEG_INFINITY] {
            assert!(matches!(
                Trajectory::new("b", two.clone(), t0(), speed),
                Err(DeconflictError::InvalidTrajectory {
                    reason: TrajectoryDefect::NonPositiveSpeed(_),
                    ..
                })
            ));
        }
        for speed in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Trajectory::new("c", two.clone(), t0(), speed),
                Err(DeconflictError::InvalidTrajectory {
                    reason: TrajectoryDefect::NonFiniteSpeed(_),
                    ..
                })
            ));
        }

        let bad = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(f64::NAN, 0.0, 0.0)];
        assert!(matches!(
            Trajectory::new("d", bad, t0(), 5.0),
            Err(DeconflictError::InvalidTrajectory {
                reason: TrajectoryDefect::NonFiniteCoordinate(1),
                ..
            })
        ));
    }

    #[test]
    fn rejects_landing_beyond_calendar_range() {
        let far = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(1e15, 0.0, 0.0)];
        let err = Trajectory::new("far", far, t0(), 1.0).unwrap_err();
        assert!(matches!(
            err,
            DeconflictError::InvalidTrajectory {
                reason: TrajectoryDefect::DurationOutOfRange(_),
                ..
            }
        ));

        // Overflowing arc length is rejected the same way.
        let huge = vec![Waypoint::new(-f64::MAX, 0.0, 0.0), Waypoint::new(f64::MAX, 0.0, 0.0)];
        assert!(Trajectory::new("huge", huge, t0(), 1.0).is_err());
    }

    #[test]
    fn sample_path_spans_whole_flight() {
        let traj = l_shaped();
        let samples = traj.sample_path(50);
        assert_eq!(samples.len(), 50);
        assert_close(samples[0], traj.waypoints()[0]);
        assert_close(samples[49], traj.waypoints()[2]);
        assert!(traj.sample_path(0).is_empty());
        assert_eq!(traj.sample_path(1), vec![traj.waypoints()[0]]);
    }
}
