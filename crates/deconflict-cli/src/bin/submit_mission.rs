//! Register a scenario's scheduled flights on a running deconfliction server,
//! then ask it to validate the primary mission.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin submit_mission -- --url http://localhost:3000 --scenario demo

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use deconflict_cli::client::{AuthorityClient, RuleOverrides};
use deconflict_cli::logging::init_tracing;
use deconflict_cli::sim::{build_scenario, ScenarioType};
use deconflict_cli::Scenario;
use deconflict_core::DetectionStrategy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Deconfliction server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Scenario file (JSON). Takes precedence over --scenario
    #[arg(long)]
    file: Option<PathBuf>,

    /// Built-in scenario
    #[arg(long, value_enum, default_value = "demo")]
    scenario: ScenarioType,

    /// Spatial buffer override in meters (server default otherwise)
    #[arg(long)]
    buffer: Option<f64>,

    /// Sample step override in seconds
    #[arg(long)]
    step: Option<f64>,

    /// Strategy override
    #[arg(long)]
    strategy: Option<DetectionStrategy>,

    /// Only validate; assume traffic is already registered
    #[arg(long)]
    skip_registration: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(false);

    let scenario = match &args.file {
        Some(path) => Scenario::from_path(path)?,
        None => build_scenario(args.scenario, Utc::now(), 20, 7),
    };
    let client = AuthorityClient::new(&args.url);

    println!("\nScenario: {}", scenario.name);
    println!("Connecting to deconfliction server at {}...", client.base_url());

    if !args.skip_registration {
        let registered = client
            .register_flights(&scenario.scheduled)
            .await
            .context("mission not validated")?;
        println!("  Registered {} flight(s)", registered);
    }

    let overrides = RuleOverrides {
        spatial_buffer_m: args.buffer,
        sample_step_s: args.step,
        strategy: args.strategy,
    };
    let result = client.validate_mission(&scenario.primary, overrides).await?;
    tracing::debug!(mission_id = %result.mission_id, "validation stored");

    println!(
        "\nMission {} -> {} (checked {} flight(s))",
        result.primary_id, result.status, result.checked_flights
    );
    for c in &result.conflicts {
        println!(
            "ALERT: Potential collision with {} at {}s",
            c.other_id, c.relative_time_s
        );
        println!("Location: {} | Separation: {}m", c.location, c.distance_m);
    }
    println!(
        "Result stored as {}/v1/missions/{}",
        client.base_url(),
        result.mission_id
    );

    Ok(())
}
