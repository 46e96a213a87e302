use rust_decimal::Decimal;

use super::simulation_model::{SimulationRequest, SimulationResponse};
use crate::errors::Result;

/// Contract for the simulation pipeline. Synchronous and non-blocking; the
/// payment capacity comes from the external credit-risk collaborator.
pub trait SimulationServiceTrait: Send + Sync {
    fn simulate(
        &self,
        request: &SimulationRequest,
        payment_capacity: Decimal,
    ) -> Result<SimulationResponse>;
}
