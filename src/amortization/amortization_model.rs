use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One period's row in an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentLine {
    pub installment_number: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub opening_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub installment_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub principal_portion: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub interest_portion: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub closing_balance: Decimal,
}

/// Level-payment schedule together with its aggregates.
///
/// Invariants upheld by the calculator: consecutive lines chain their
/// balances, every line decomposes its installment into principal plus
/// interest, and the final closing balance is exactly zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    pub lines: Vec<InstallmentLine>,
    #[serde(with = "rust_decimal::serde::str")]
    pub periodic_installment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_interest: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_paid: Decimal,
}
