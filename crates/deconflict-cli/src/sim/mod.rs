//! Built-in traffic scenarios for exercising the deconfliction authority.

mod scenarios;

pub use scenarios::{
    build_scenario, create_converging_scenario, create_crossing_scenario, create_delayed_scenario,
    create_demo_scenario, create_parallel_scenario, create_random_scenario, ScenarioType,
};
