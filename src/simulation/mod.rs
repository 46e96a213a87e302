mod simulation_model;
mod simulation_service;
mod simulation_traits;

pub use simulation_model::{SimulationConfig, SimulationRequest, SimulationResponse};
pub use simulation_service::SimulationService;
pub use simulation_traits::SimulationServiceTrait;
