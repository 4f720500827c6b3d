//! Validate a mission against scheduled traffic, locally.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin validate_mission -- --scenario demo --buffer 10
//!   cargo run -p deconflict-cli --bin validate_mission -- --file scenarios/survey_pattern.json --json
//!
//! Exits with status 2 when the mission conflicts.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use deconflict_cli::logging::init_tracing;
use deconflict_cli::sim::{build_scenario, ScenarioType};
use deconflict_cli::Scenario;
use deconflict_core::{DeconflictionRules, DetectionStrategy, MissionStatus, ValidationReport};
use std::path::PathBuf;
use std::process::ExitCode;

/// Pre-flight deconfliction check
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario file (JSON). Takes precedence over --scenario
    #[arg(long)]
    file: Option<PathBuf>,

    /// Built-in scenario
    #[arg(long, value_enum, default_value = "demo")]
    scenario: ScenarioType,

    /// Spatial buffer in meters
    #[arg(long, default_value_t = 10.0)]
    buffer: f64,

    /// Sample step in seconds
    #[arg(long, default_value_t = 0.5)]
    step: f64,

    /// Breach reporting strategy (first_breach | closest_approach)
    #[arg(long, default_value_t = DetectionStrategy::FirstBreach)]
    strategy: DetectionStrategy,

    /// Number of flights for the random scenario
    #[arg(long, default_value_t = 20)]
    random_flights: usize,

    /// Seed for the random scenario
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let scenario = match &args.file {
        Some(path) => Scenario::from_path(path)?,
        None => build_scenario(args.scenario, Utc::now(), args.random_flights, args.seed),
    };
    let rules = DeconflictionRules::with_buffer(args.buffer)
        .sample_step(args.step)
        .strategy(args.strategy);

    tracing::info!(
        scenario = %scenario.name,
        scheduled = scenario.scheduled.len(),
        "validating mission {}",
        scenario.primary.id
    );
    let report = scenario.validate(rules)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&scenario, &report);
    }

    Ok(match report.status {
        MissionStatus::Clear => ExitCode::SUCCESS,
        MissionStatus::Conflict => ExitCode::from(2),
    })
}

fn print_report(scenario: &Scenario, report: &ValidationReport) {
    println!("--- Validating Mission: {} ---", scenario.primary.id);
    println!("Status: {}", report.status);
    for c in &report.conflicts {
        println!(
            "ALERT: Potential collision with {} at {}s",
            c.other_id, c.relative_time_s
        );
        println!("Location: {} | Separation: {}m", c.location, c.distance_m);
    }
}
