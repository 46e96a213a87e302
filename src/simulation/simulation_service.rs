use rust_decimal::Decimal;

use super::simulation_model::{SimulationConfig, SimulationRequest, SimulationResponse};
use super::simulation_traits::SimulationServiceTrait;
use crate::decision::DecisionService;
use crate::errors::Result;
use crate::scenarios::{ScenarioName, ScenarioService};

/// Runs a full simulation: requested scenario, the three alternates, and
/// the request-level approvability verdict.
pub struct SimulationService {
    scenario_service: ScenarioService,
    decision_service: DecisionService,
    max_term_months: u32,
}

impl SimulationService {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            scenario_service: ScenarioService::new(config.scenario),
            decision_service: DecisionService::new(config.approval_policy),
            max_term_months: config.max_term_months,
        }
    }
}

impl SimulationServiceTrait for SimulationService {
    fn simulate(
        &self,
        request: &SimulationRequest,
        payment_capacity: Decimal,
    ) -> Result<SimulationResponse> {
        request.validate()?;

        let requested = self.scenario_service.build_scenario(
            ScenarioName::Requested,
            request.down_payment,
            request.requested_amount,
            request.term_months,
            request.interest_rate_percent,
        )?;

        let alternates = self.scenario_service.generate_scenarios(
            &request.financing_terms(),
            request.vehicle_value,
            request.interest_rate_percent,
            self.max_term_months,
        )?;

        let decision =
            self.decision_service
                .decide_request(&requested, &alternates, payment_capacity)?;

        let mut scenarios = Vec::with_capacity(1 + alternates.len());
        scenarios.push(requested);
        scenarios.extend(alternates);

        Ok(SimulationResponse {
            scenarios,
            approvable: decision.approvable,
            rejection_reason: decision.reason,
        })
    }
}
