//! Deconfliction rules and thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DeconflictError, Result};

/// Default spatial separation buffer in meters.
pub const DEFAULT_SPATIAL_BUFFER_M: f64 = 5.0;
/// Default sampling resolution in seconds.
pub const DEFAULT_SAMPLE_STEP_S: f64 = 0.5;
/// Default (reserved) temporal buffer in seconds.
pub const DEFAULT_TEMPORAL_BUFFER_S: f64 = 10.0;

/// Which breach to report when a flight violates the buffer more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Earliest sampled breach along the primary's timeline
    #[default]
    FirstBreach,
    /// Sampled breach with the smallest separation (earliest on ties)
    ClosestApproach,
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionStrategy::FirstBreach => write!(f, "first_breach"),
            DetectionStrategy::ClosestApproach => write!(f, "closest_approach"),
        }
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "first_breach" | "first" => Ok(DetectionStrategy::FirstBreach),
            "closest_approach" | "closest" => Ok(DetectionStrategy::ClosestApproach),
            other => Err(format!(
                "unknown strategy '{}', expected first_breach or closest_approach",
                other
            )),
        }
    }
}

/// Configuration applied uniformly to every pairwise check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeconflictionRules {
    /// Minimum allowed separation in meters
    pub spatial_buffer_m: f64,
    /// Sampling resolution along the primary's timeline in seconds.
    /// Finer steps catch shorter near-misses at higher cost.
    pub sample_step_s: f64,
    #[serde(default)]
    pub strategy: DetectionStrategy,
    /// Reserved. Accepted for compatibility but never applied.
    #[serde(default)]
    pub temporal_buffer_s: Option<f64>,
}

impl Default for DeconflictionRules {
    fn default() -> Self {
        Self {
            spatial_buffer_m: DEFAULT_SPATIAL_BUFFER_M,
            sample_step_s: DEFAULT_SAMPLE_STEP_S,
            strategy: DetectionStrategy::FirstBreach,
            temporal_buffer_s: Some(DEFAULT_TEMPORAL_BUFFER_S),
        }
    }
}

impl DeconflictionRules {
    pub fn with_buffer(spatial_buffer_m: f64) -> Self {
        Self {
            spatial_buffer_m,
            ..Self::default()
        }
    }

    pub fn sample_step(mut self, sample_step_s: f64) -> Self {
        self.sample_step_s = sample_step_s;
        self
    }

    pub fn strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check that buffer and step are positive finite numbers.
    pub fn validate(&self) -> Result<()> {
        check_positive("spatial_buffer_m", self.spatial_buffer_m)?;
        check_positive("sample_step_s", self.sample_step_s)?;
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DeconflictError::InvalidRules { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let rules = DeconflictionRules::default();
        assert_eq!(rules.spatial_buffer_m, 5.0);
        assert_eq!(rules.sample_step_s, 0.5);
        assert_eq!(rules.strategy, DetectionStrategy::FirstBreach);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let err = DeconflictionRules::with_buffer(0.0).validate().unwrap_err();
        assert_eq!(
            err,
            DeconflictError::InvalidRules {
                field: "spatial_buffer_m",
                value: 0.0
            }
        );
        assert!(DeconflictionRules::default()
            .sample_step(-0.5)
            .validate()
            .is_err());
        assert!(DeconflictionRules::default()
            .sample_step(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn strategy_parses_from_config_strings() {
        assert_eq!(
            "closest-approach".parse::<DetectionStrategy>(),
            Ok(DetectionStrategy::ClosestApproach)
        );
        assert_eq!("FIRST".parse(), Ok(DetectionStrategy::FirstBreach));
        assert!("nearest".parse::<DetectionStrategy>().is_err());
    }

    #[test]
    fn rules_deserialize_with_optional_fields() {
        let rules: DeconflictionRules =
            serde_json::from_str(r#"{"spatial_buffer_m": 10.0, "sample_step_s": 0.25}"#).unwrap();
        assert_eq!(rules.strategy, DetectionStrategy::FirstBreach);
        assert_eq!(rules.temporal_buffer_s, None);
    }
}
