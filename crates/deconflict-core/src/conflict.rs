//! Conflict detection for a candidate mission.
//!
//! The primary's timeline is sampled at a fixed step. Each registered
//! flight is aligned onto that timeline through the global clock and
//! checked for separation at every instant where both flights are airborne.

use chrono::{DateTime, Utc};

use crate::error::{DeconflictError, Result};
use crate::models::{ConflictRecord, Position, ValidationReport};
use crate::rules::{DeconflictionRules, DetectionStrategy};
use crate::spatial::{euclidean_distance, round_to};
use crate::trajectory::Trajectory;

/// Decimal places kept in reported times and distances.
const REPORT_PRECISION: i32 = 2;

/// Upper bound on sample instants along one primary's timeline.
/// A 20 minute flight at the default 0.5s step needs 2400.
pub const MAX_SAMPLES: u64 = 1_000_000;

#[derive(Debug, Clone, Copy)]
struct Breach {
    time_s: f64,
    location: Position,
    distance_m: f64,
}

/// Validates missions against scheduled flights under a fixed rule set.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    rules: DeconflictionRules,
}

impl ConflictDetector {
    /// Create a detector, rejecting a non-positive buffer or sample step.
    pub fn new(rules: DeconflictionRules) -> Result<Self> {
        rules.validate()?;
        if let Some(temporal_buffer_s) = rules.temporal_buffer_s {
            tracing::debug!(
                temporal_buffer_s,
                "temporal buffer is reserved and has no effect on detection"
            );
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &DeconflictionRules {
        &self.rules
    }

    /// Check `primary` against every flight in `scheduled`.
    ///
    /// Produces at most one record per scheduled flight, in iteration order.
    /// Fails with [`DeconflictError::TooManySamples`] when the primary's
    /// duration divided by the step exceeds [`MAX_SAMPLES`].
    pub fn validate<'a, I>(&self, primary: &Trajectory, scheduled: I) -> Result<ValidationReport>
    where
        I: IntoIterator<Item = &'a Trajectory>,
    {
        let duration_s = primary.total_duration();
        let step_s = self.rules.sample_step_s;
        if duration_s / step_s > MAX_SAMPLES as f64 {
            return Err(DeconflictError::TooManySamples {
                id: primary.id().to_string(),
                duration_s,
                step_s,
                max: MAX_SAMPLES,
            });
        }

        let samples = sample_times(duration_s, step_s);
        let mut checked = 0usize;

        let conflicts: Vec<ConflictRecord> = scheduled
            .into_iter()
            .inspect(|_| checked += 1)
            .filter_map(|other| self.check_flight(primary, other, samples.clone()))
            .collect();

        let report = ValidationReport::from_conflicts(conflicts);
        tracing::info!(
            primary = primary.id(),
            status = %report.status,
            checked_flights = checked,
            conflicts = report.conflicts.len(),
            step_s,
            "mission validated"
        );
        Ok(report)
    }

    /// Evaluate one scheduled flight against the primary's sample times.
    pub fn check_flight(
        &self,
        primary: &Trajectory,
        other: &Trajectory,
        samples: impl IntoIterator<Item = f64>,
    ) -> Option<ConflictRecord> {
        let offset_s = time_offset_s(primary.start_time(), other.start_time());
        let buffer = self.rules.spatial_buffer_m;

        let mut breaches = samples.into_iter().filter_map(|t| {
            let p_pos = primary.position_at(t).position()?;
            let o_pos = other.position_at(t - offset_s).position()?;
            let distance_m = euclidean_distance(&p_pos, &o_pos);
            (distance_m < buffer).then_some(Breach {
                time_s: t,
                location: p_pos,
                distance_m,
            })
        });

        let breach = match self.rules.strategy {
            DetectionStrategy::FirstBreach => breaches.next(),
            DetectionStrategy::ClosestApproach => breaches.fold(None, |best: Option<Breach>, b| {
                match best {
                    Some(best) if best.distance_m <= b.distance_m => Some(best),
                    _ => Some(b),
                }
            }),
        }?;

        tracing::debug!(
            primary = primary.id(),
            other = other.id(),
            time_s = breach.time_s,
            distance_m = breach.distance_m,
            "separation breach"
        );

        Some(ConflictRecord {
            other_id: other.id().to_string(),
            relative_time_s: round_to(breach.time_s, REPORT_PRECISION),
            location: breach.location,
            distance_m: round_to(breach.distance_m, REPORT_PRECISION),
        })
    }
}

/// Relative sample times `0, step, 2*step, ...` strictly below `duration_s`.
///
/// Times are computed as `k * step` rather than accumulated, so long
/// flights do not drift. The sequence is lazy and empty for a non-positive
/// or non-finite step or duration.
pub fn sample_times(duration_s: f64, step_s: f64) -> impl Iterator<Item = f64> + Clone {
    let valid = step_s.is_finite() && step_s > 0.0 && duration_s.is_finite();
    let end = if valid { duration_s } else { 0.0 };
    (0u64..)
        .map(move |k| k as f64 * step_s)
        .take_while(move |&t| t < end)
}

/// Seconds from the primary's takeoff to the other flight's takeoff.
///
/// A primary-relative time `t` maps to `t - offset` on the other flight.
pub fn time_offset_s(primary_start: DateTime<Utc>, other_start: DateTime<Utc>) -> f64 {
    let delta = other_start.signed_duration_since(primary_start);
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
