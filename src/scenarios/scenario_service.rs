use rust_decimal::Decimal;

use super::scenario_model::{FinancingTerms, Scenario, ScenarioConfig, ScenarioName};
use crate::amortization::compute_schedule;
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};

/// Derives the comparison set of financing scenarios for one request.
///
/// Stateless apart from its configuration; safe to share across tasks.
pub struct ScenarioService {
    config: ScenarioConfig,
}

impl ScenarioService {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Builds the three named alternates for a request.
    ///
    /// A failure in any one scenario fails the whole batch; presenting an
    /// incomplete comparison set is unsafe for a credit decision.
    pub fn generate_scenarios(
        &self,
        terms: &FinancingTerms,
        vehicle_value: Decimal,
        nominal_rate_percent: Decimal,
        max_term_months: u32,
    ) -> Result<Vec<Scenario>> {
        if vehicle_value <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Vehicle value must be positive, got {}",
                vehicle_value
            ))));
        }

        let standard_down = (vehicle_value * self.config.standard_down_payment_rate)
            .round_dp(DECIMAL_PRECISION);

        let scenarios = vec![
            self.build_scenario(
                ScenarioName::StandardDownPayment,
                standard_down,
                vehicle_value - standard_down,
                terms.term_months,
                nominal_rate_percent,
            )?,
            self.build_scenario(
                ScenarioName::ZeroDownPayment,
                Decimal::ZERO,
                vehicle_value,
                terms.term_months,
                nominal_rate_percent,
            )?,
            self.build_scenario(
                ScenarioName::MaxTerm,
                terms.down_payment,
                terms.requested_amount,
                max_term_months,
                nominal_rate_percent,
            )?,
        ];

        Ok(scenarios)
    }

    /// Builds a single scenario by delegating to the amortization calculator.
    pub fn build_scenario(
        &self,
        name: ScenarioName,
        down_payment: Decimal,
        financed_amount: Decimal,
        term_months: u32,
        nominal_rate_percent: Decimal,
    ) -> Result<Scenario> {
        if financed_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Financed amount for scenario '{}' must be positive, got {}",
                name, financed_amount
            ))));
        }

        let schedule = compute_schedule(financed_amount, nominal_rate_percent, term_months)?;

        Ok(Scenario {
            name,
            down_payment,
            financed_amount,
            term_months,
            installment: schedule.periodic_installment,
            total_interest: schedule.total_interest,
            total_paid: schedule.total_paid,
            schedule,
        })
    }
}
