//! Server configuration from environment.

use deconflict_core::DeconflictionRules;
use std::env;
use std::str::FromStr;

/// Validation results kept in memory before the oldest are evicted.
pub const DEFAULT_MISSION_HISTORY: usize = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Rules applied when a validation request does not override them
    pub rules: DeconflictionRules,
    /// Maximum stored mission results
    pub mission_history: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Each setting that is unset or
    /// invalid falls back to its own default; the others are kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = DeconflictionRules::default();
        let positive = |value: &f64| value.is_finite() && *value > 0.0;

        let rules = DeconflictionRules {
            spatial_buffer_m: setting(
                &lookup,
                "DECONFLICT_SPATIAL_BUFFER_M",
                defaults.spatial_buffer_m,
                positive,
            ),
            sample_step_s: setting(
                &lookup,
                "DECONFLICT_SAMPLE_STEP_S",
                defaults.sample_step_s,
                positive,
            ),
            strategy: setting(&lookup, "DECONFLICT_STRATEGY", defaults.strategy, |_| true),
            temporal_buffer_s: Some(setting(
                &lookup,
                "DECONFLICT_TEMPORAL_BUFFER_S",
                defaults.temporal_buffer_s.unwrap_or_default(),
                |value: &f64| value.is_finite() && *value >= 0.0,
            )),
        };

        Self {
            server_port: setting(&lookup, "DECONFLICT_PORT", 3000, |_| true),
            rules,
            mission_history: setting(
                &lookup,
                "DECONFLICT_MISSION_HISTORY",
                DEFAULT_MISSION_HISTORY,
                |n: &usize| *n > 0,
            ),
        }
    }
}

fn setting<T, L, A>(lookup: &L, key: &str, default: T, accept: A) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    L: Fn(&str) -> Option<String>,
    A: Fn(&T) -> bool,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            tracing::warn!("Ignoring {}={:?}, using {}", key, raw, default);
            default
        }
    }
}
