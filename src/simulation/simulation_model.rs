use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_TERM_MONTHS;
use crate::decision::ApprovalPolicy;
use crate::errors::{Error, Result, ValidationError};
use crate::scenarios::{FinancingTerms, Scenario, ScenarioConfig};

/// Stable wire shape of a simulation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub requested_amount: Decimal,
    pub term_months: u32,
    pub interest_rate_percent: Decimal,
    pub vehicle_value: Decimal,
    pub down_payment: Decimal,
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<()> {
        if self.requested_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Requested amount must be positive".to_string(),
            )));
        }
        if self.vehicle_value <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Vehicle value must be positive".to_string(),
            )));
        }
        if self.down_payment.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Down payment cannot be negative".to_string(),
            )));
        }
        Ok(())
    }

    pub fn financing_terms(&self) -> FinancingTerms {
        FinancingTerms {
            requested_amount: self.requested_amount,
            down_payment: self.down_payment,
            term_months: self.term_months,
        }
    }
}

/// Stable wire shape of a simulation response: the requested scenario first,
/// followed by the generated alternates, plus the request-level verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub scenarios: Vec<Scenario>,
    pub approvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Tunables for the simulation pipeline.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub scenario: ScenarioConfig,
    pub approval_policy: ApprovalPolicy,
    /// Term ceiling used by the max-term scenario.
    pub max_term_months: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            scenario: ScenarioConfig::default(),
            approval_policy: ApprovalPolicy::default(),
            max_term_months: DEFAULT_MAX_TERM_MONTHS,
        }
    }
}
