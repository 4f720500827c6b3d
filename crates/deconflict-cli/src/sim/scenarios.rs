//! Pre-defined flight scenarios for testing.
//!
//! All coordinates are local meters around an origin at (0, 0); altitude is z.

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use deconflict_core::{FlightRequest, Waypoint, DEFAULT_SPEED_MPS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scenario::Scenario;

const CRUISE_ALTITUDE_M: f64 = 20.0;
const SURVEY_ALTITUDE_M: f64 = 80.0;
/// Half-width of the area random traffic is drawn from
const RANDOM_AREA_M: f64 = 200.0;

/// Available built-in scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioType {
    /// Cargo drone crossing the primary's path, plus a survey drone 60m above
    Demo,
    /// One drone crossing the primary's path at the same altitude
    Crossing,
    /// A drone flying parallel 100m away
    Parallel,
    /// Three drones converging on the center while the primary crosses it
    Converging,
    /// The crossing drone departs after the primary has landed
    Delayed,
    /// Random straight-line traffic (seeded)
    Random,
}

/// Build a built-in scenario with every flight anchored at `start`.
pub fn build_scenario(
    kind: ScenarioType,
    start: DateTime<Utc>,
    random_flights: usize,
    seed: u64,
) -> Scenario {
    match kind {
        ScenarioType::Demo => create_demo_scenario(start),
        ScenarioType::Crossing => create_crossing_scenario(start),
        ScenarioType::Parallel => create_parallel_scenario(start),
        ScenarioType::Converging => create_converging_scenario(start),
        ScenarioType::Delayed => create_delayed_scenario(start),
        ScenarioType::Random => create_random_scenario(start, random_flights, seed),
    }
}

fn straight(id: &str, from: [f64; 3], to: [f64; 3], start: DateTime<Utc>, speed: f64) -> FlightRequest {
    FlightRequest::new(id, vec![from.into(), to.into()], start, speed)
}

/// Primary mission flying south to north through (50, 50).
fn primary_alpha(start: DateTime<Utc>) -> FlightRequest {
    straight(
        "Primary_Alpha",
        [50.0, 0.0, CRUISE_ALTITUDE_M],
        [50.0, 100.0, CRUISE_ALTITUDE_M],
        start,
        DEFAULT_SPEED_MPS,
    )
}

fn cargo_drone(start: DateTime<Utc>) -> FlightRequest {
    straight(
        "Drone_B_Cargo",
        [0.0, 50.0, CRUISE_ALTITUDE_M],
        [100.0, 50.0, CRUISE_ALTITUDE_M],
        start,
        DEFAULT_SPEED_MPS,
    )
}

/// The reference demo: one conflicting and one vertically separated flight.
pub fn create_demo_scenario(start: DateTime<Utc>) -> Scenario {
    let survey = straight(
        "Drone_C_Survey",
        [50.0, 0.0, SURVEY_ALTITUDE_M],
        [50.0, 100.0, SURVEY_ALTITUDE_M],
        start,
        DEFAULT_SPEED_MPS,
    );

    Scenario {
        name: "demo".to_string(),
        scheduled: vec![cargo_drone(start), survey],
        primary: primary_alpha(start),
    }
}

/// Create one drone on a collision course (crossing at the center).
pub fn create_crossing_scenario(start: DateTime<Utc>) -> Scenario {
    Scenario {
        name: "crossing".to_string(),
        scheduled: vec![cargo_drone(start)],
        primary: primary_alpha(start),
    }
}

/// Create a drone flying parallel to the primary (no conflict).
pub fn create_parallel_scenario(start: DateTime<Utc>) -> Scenario {
    let separation_m = 100.0;
    let parallel = straight(
        "Drone_P_Parallel",
        [50.0 + separation_m, 0.0, CRUISE_ALTITUDE_M],
        [50.0 + separation_m, 100.0, CRUISE_ALTITUDE_M],
        start,
        DEFAULT_SPEED_MPS,
    );

    Scenario {
        name: "parallel".to_string(),
        scheduled: vec![parallel],
        primary: primary_alpha(start),
    }
}

/// Create drones converging on the center from north, east and south while
/// the primary crosses from west to east.
pub fn create_converging_scenario(start: DateTime<Utc>) -> Scenario {
    let offset_m = 300.0;
    let angles: [f64; 3] = [90.0, 0.0, 270.0];

    let scheduled = angles
        .iter()
        .enumerate()
        .map(|(i, &angle)| {
            let angle_rad = angle.to_radians();
            let from = [
                offset_m * angle_rad.cos(),
                offset_m * angle_rad.sin(),
                50.0,
            ];
            straight(&format!("DRONE{:03}", i + 1), from, [0.0, 0.0, 50.0], start, 8.0)
        })
        .collect();

    Scenario {
        name: "converging".to_string(),
        scheduled,
        primary: straight(
            "Primary_Crossing",
            [-offset_m, 0.0, 50.0],
            [offset_m, 0.0, 50.0],
            start,
            10.0,
        ),
    }
}

/// Same geometry as the crossing scenario, but the other drone departs
/// two minutes after the primary has landed.
pub fn create_delayed_scenario(start: DateTime<Utc>) -> Scenario {
    let primary = primary_alpha(start);
    let late = start + Duration::seconds(20 + 120);

    Scenario {
        name: "delayed".to_string(),
        scheduled: vec![cargo_drone(late)],
        primary,
    }
}

/// Random two-point traffic at a handful of altitude layers, departing
/// within a minute of `start`.
pub fn create_random_scenario(start: DateTime<Utc>, count: usize, seed: u64) -> Scenario {
    let mut rng = StdRng::seed_from_u64(seed);

    let scheduled = (0..count)
        .map(|i| {
            let altitude = [20.0, 40.0, 60.0][rng.random_range(0..3)];
            let from = random_point(&mut rng, altitude);
            let to = random_point(&mut rng, altitude);
            let delay = Duration::milliseconds(rng.random_range(0..60_000));
            let speed = rng.random_range(3.0..12.0);
            FlightRequest::new(format!("RANDOM{:03}", i + 1), vec![from, to], start + delay, speed)
        })
        .collect();

    Scenario {
        name: "random".to_string(),
        scheduled,
        primary: straight(
            "Primary_Random",
            [-RANDOM_AREA_M, 0.0, 40.0],
            [RANDOM_AREA_M, 0.0, 40.0],
            start,
            DEFAULT_SPEED_MPS * 2.0,
        ),
    }
}

fn random_point(rng: &mut StdRng, altitude_m: f64) -> Waypoint {
    Waypoint::new(
        rng.random_range(-RANDOM_AREA_M..RANDOM_AREA_M),
        rng.random_range(-RANDOM_AREA_M..RANDOM_AREA_M),
        altitude_m,
    )
}
