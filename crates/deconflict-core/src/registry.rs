//! Registry of scheduled flights.
//!
//! [`FlightRegistry`] is append-only: flights are added, never edited or
//! removed. It is a plain single-owner value. [`SharedRegistry`] is the
//! multi-reader/multi-writer form: writers take the write lock only to
//! append; validation clones a snapshot under the read lock and runs the
//! detector after releasing it, so a long validation never blocks
//! registration.

use std::sync::{Arc, RwLock};

use crate::conflict::ConflictDetector;
use crate::error::Result;
use crate::models::ValidationReport;
use crate::rules::DeconflictionRules;
use crate::trajectory::Trajectory;

/// Ordered, append-only collection of scheduled trajectories.
#[derive(Debug, Clone, Default)]
pub struct FlightRegistry {
    flights: Vec<Arc<Trajectory>>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a flight. Ids are opaque labels; duplicates are kept.
    pub fn add_flight(&mut self, trajectory: impl Into<Arc<Trajectory>>) {
        let trajectory = trajectory.into();
        tracing::debug!(
            flight = trajectory.id(),
            duration_s = trajectory.total_duration(),
            "registered flight"
        );
        self.flights.push(trajectory);
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.flights.iter().map(Arc::as_ref)
    }

    pub fn get(&self, id: &str) -> Option<&Trajectory> {
        self.iter().find(|flight| flight.id() == id)
    }

    /// Cheap copy of the current contents.
    pub fn snapshot(&self) -> Vec<Arc<Trajectory>> {
        self.flights.clone()
    }

    /// Validate `primary` with the default strategy and the given buffer and step.
    pub fn validate_mission(
        &self,
        primary: &Trajectory,
        spatial_buffer_m: f64,
        sample_step_s: f64,
    ) -> Result<ValidationReport> {
        let rules = DeconflictionRules::with_buffer(spatial_buffer_m).sample_step(sample_step_s);
        self.validate_with_rules(primary, rules)
    }

    pub fn validate_with_rules(
        &self,
        primary: &Trajectory,
        rules: DeconflictionRules,
    ) -> Result<ValidationReport> {
        let detector = ConflictDetector::new(rules)?;
        detector.validate(primary, self.iter())
    }
}

/// Thread-safe handle to a [`FlightRegistry`].
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<FlightRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flight(&self, trajectory: impl Into<Arc<Trajectory>>) {
        let trajectory = trajectory.into();
        match self.inner.write() {
            Ok(mut registry) => registry.add_flight(trajectory),
            // Appends are atomic, so a poisoned lock still holds a consistent list.
            Err(poisoned) => poisoned.into_inner().add_flight(trajectory),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flights registered at the time of the call.
    pub fn snapshot(&self) -> Vec<Arc<Trajectory>> {
        match self.inner.read() {
            Ok(registry) => registry.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }

    /// Validate against a snapshot taken at call time; the lock is not held
    /// while sampling.
    pub fn validate_mission(
        &self,
        primary: &Trajectory,
        rules: DeconflictionRules,
    ) -> Result<ValidationReport> {
        let detector = ConflictDetector::new(rules)?;
        let flights = self.snapshot();
        detector.validate(primary, flights.iter().map(Arc::as_ref))
    }
}
