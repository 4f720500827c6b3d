//! Reference demo: a primary mission crossing a cargo drone's path while a
//! survey drone passes overhead.
//!
//! Prints the verdict and writes sampled paths plus conflict markers to a
//! JSON file for plotting.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin demo_scenario -- --output deconfliction_paths.json

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use deconflict_cli::export::{PathExport, DEFAULT_PATH_SAMPLES};
use deconflict_cli::logging::init_tracing;
use deconflict_cli::sim::create_demo_scenario;
use deconflict_core::DeconflictionRules;
use std::path::PathBuf;

/// Separation enforced in the demo
const SPATIAL_BUFFER_M: f64 = 10.0;
const TITLE: &str = "UAV Strategic Deconfliction - 4D Spatiotemporal Analysis";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Where to write the path export
    #[arg(long, default_value = "deconfliction_paths.json")]
    output: PathBuf,

    /// Samples per flight in the export
    #[arg(long, default_value_t = DEFAULT_PATH_SAMPLES)]
    samples: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(false);

    let scenario = create_demo_scenario(Utc::now());
    let registry = scenario.registry()?;
    let primary = scenario.primary_trajectory()?;

    println!("--- Validating Mission: {} ---", primary.id());
    let report =
        registry.validate_with_rules(&primary, DeconflictionRules::with_buffer(SPATIAL_BUFFER_M))?;

    println!("Status: {}", report.status);
    for c in &report.conflicts {
        println!(
            "ALERT: Potential collision with {} at {}s",
            c.other_id, c.relative_time_s
        );
        println!("Location: {} | Separation: {}m", c.location, c.distance_m);
    }

    let export = PathExport::build(TITLE, &primary, &registry, &report, args.samples);
    export.write_to(&args.output)?;
    println!(
        "\nPath data saved to '{}'. Feed it to a 3D plotter to inspect the paths.",
        args.output.display()
    );

    Ok(())
}
