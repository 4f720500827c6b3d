//! Deconfliction CLI - command line tools for the deconfliction authority.
//!
//! Binaries:
//! - validate_mission: validate a scenario file or built-in scenario locally
//! - demo_scenario: the reference demo, with path export for plotting
//! - submit_mission: register traffic and validate a mission on a running server

pub mod client;
pub mod export;
pub mod logging;
pub mod scenario;
pub mod sim;

pub use scenario::Scenario;
