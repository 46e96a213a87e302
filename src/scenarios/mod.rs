mod scenario_model;
mod scenario_service;

pub use scenario_model::{FinancingTerms, Scenario, ScenarioConfig, ScenarioName};
pub use scenario_service::ScenarioService;
