use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationSchedule;
use crate::constants::STANDARD_DOWN_PAYMENT_RATE;

/// Named financing alternatives derived from one loan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioName {
    /// Down payment at the configured standard fraction of the vehicle value.
    StandardDownPayment,
    /// Full vehicle value financed, no down payment.
    ZeroDownPayment,
    /// Requested amounts stretched over the maximum allowable term.
    MaxTerm,
    /// The terms exactly as the applicant requested them.
    Requested,
}

impl ScenarioName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::StandardDownPayment => "standard-down-payment",
            ScenarioName::ZeroDownPayment => "zero-down-payment",
            ScenarioName::MaxTerm => "max-term",
            ScenarioName::Requested => "requested",
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request-side inputs scenario derivation works from.
#[derive(Debug, Clone, Copy)]
pub struct FinancingTerms {
    pub requested_amount: Decimal,
    pub down_payment: Decimal,
    pub term_months: u32,
}

/// One fully specified financing alternative for a loan request.
///
/// All scenarios for one request share the nominal rate and vehicle value;
/// they differ in financed principal and/or term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: ScenarioName,
    #[serde(with = "rust_decimal::serde::str")]
    pub down_payment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub financed_amount: Decimal,
    pub term_months: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub installment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_interest: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_paid: Decimal,
    pub schedule: AmortizationSchedule,
}

/// Tunables for scenario derivation.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Fraction of the vehicle value used as the standard down payment.
    pub standard_down_payment_rate: Decimal,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            standard_down_payment_rate: STANDARD_DOWN_PAYMENT_RATE,
        }
    }
}
