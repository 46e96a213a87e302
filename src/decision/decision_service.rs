use rust_decimal::Decimal;

use super::decision_model::{ApprovalPolicy, Decision};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};
use crate::scenarios::Scenario;

/// Compares scenario installments against a borrower's payment capacity.
pub struct DecisionService {
    policy: ApprovalPolicy,
}

impl DecisionService {
    pub fn new(policy: ApprovalPolicy) -> Self {
        Self { policy }
    }

    /// Per-scenario verdict: approvable when the periodic installment does
    /// not exceed the declared payment capacity. Total over every valid
    /// scenario/capacity pair; there is no "unknown" outcome.
    pub fn decide(&self, scenario: &Scenario, payment_capacity: Decimal) -> Result<Decision> {
        if payment_capacity.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Payment capacity must be non-negative, got {}",
                payment_capacity
            ))));
        }

        if scenario.installment <= payment_capacity {
            return Ok(Decision::approved());
        }

        let shortfall = scenario.installment - payment_capacity;
        Ok(Decision::rejected(format!(
            "periodic installment {} exceeds declared payment capacity {} by {}",
            scenario.installment.round_dp(DISPLAY_DECIMAL_PRECISION),
            payment_capacity.round_dp(DISPLAY_DECIMAL_PRECISION),
            shortfall.round_dp(DISPLAY_DECIMAL_PRECISION)
        )))
    }

    /// Request-level verdict under the configured [`ApprovalPolicy`].
    pub fn decide_request(
        &self,
        requested: &Scenario,
        alternates: &[Scenario],
        payment_capacity: Decimal,
    ) -> Result<Decision> {
        match self.policy {
            ApprovalPolicy::RequestedScenario => self.decide(requested, payment_capacity),
            ApprovalPolicy::AllScenarios => {
                for scenario in std::iter::once(requested).chain(alternates.iter()) {
                    let decision = self.decide(scenario, payment_capacity)?;
                    if !decision.approvable {
                        let reason = decision.reason.unwrap_or_default();
                        return Ok(Decision::rejected(format!(
                            "scenario '{}': {}",
                            scenario.name, reason
                        )));
                    }
                }
                Ok(Decision::approved())
            }
        }
    }
}
