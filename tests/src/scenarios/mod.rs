//! End-to-end signing scenarios loaded from TOML.

pub mod error;
pub mod loader;
pub mod model;
pub mod runner;

pub use error::{Result, ScenarioError};
pub use loader::{load_scenarios, scenario_path};
pub use model::{Scenario, ScenarioFile, Tamper};
pub use runner::{run_scenario, ScenarioOutcome};
