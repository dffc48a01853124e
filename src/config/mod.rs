pub mod craft;
pub mod scenario;
pub mod scenario_errors;

pub use craft::CraftTuning;
pub use scenario::{DerivedScenario, ScenarioConfig, TerrainConfig};
pub use scenario_errors::ScenarioError;
