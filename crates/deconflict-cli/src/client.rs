//! HTTP client for a running deconfliction server.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use deconflict_core::{ConflictRecord, DetectionStrategy, FlightRequest, MissionStatus};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Per-request overrides of the server's configured rules.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RuleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_buffer_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_step_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DetectionStrategy>,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    mission: &'a FlightRequest,
    #[serde(flatten)]
    overrides: RuleOverrides,
}

/// Stored validation result as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct MissionResponse {
    pub mission_id: String,
    pub primary_id: String,
    pub status: MissionStatus,
    pub conflicts: Vec<ConflictRecord>,
    pub checked_flights: usize,
    pub validated_at: DateTime<Utc>,
}

pub struct AuthorityClient {
    client: Client,
    base_url: String,
}

impl AuthorityClient {
    /// `base_url` is e.g. "http://localhost:3000"; a trailing slash is ignored.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register every flight, in order.
    ///
    /// All flights are attempted; if the server rejects any of them the
    /// whole call fails naming the rejected ids, so a mission is never
    /// validated against partial traffic.
    pub async fn register_flights(&self, flights: &[FlightRequest]) -> Result<usize> {
        let mut rejected = Vec::new();
        for flight in flights {
            let resp = self
                .client
                .post(format!("{}/v1/flights", self.base_url))
                .json(flight)
                .send()
                .await
                .with_context(|| format!("failed to reach {}", self.base_url))?;
            if resp.status().is_success() {
                tracing::info!("Registered {}", flight.id);
            } else {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                tracing::error!("Failed to register {}: {} {}", flight.id, status, body);
                rejected.push(flight.id.as_str());
            }
        }

        if !rejected.is_empty() {
            bail!(
                "{} scheduled flight(s) rejected by the server: {}",
                rejected.len(),
                rejected.join(", ")
            );
        }
        Ok(flights.len())
    }

    /// Validate a mission against the server's current schedule.
    pub async fn validate_mission(
        &self,
        mission: &FlightRequest,
        overrides: RuleOverrides,
    ) -> Result<MissionResponse> {
        let resp = self
            .client
            .post(format!("{}/v1/missions/validate", self.base_url))
            .json(&ValidateRequest { mission, overrides })
            .send()
            .await
            .context("validation request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("server rejected mission {}: {} {}", mission.id, status, body);
        }

        resp.json().await.context("invalid validation response")
    }
}
