use rust_decimal::{Decimal, MathematicalOps};

use super::amortization_model::{AmortizationSchedule, InstallmentLine};
use crate::constants::{
    DECIMAL_PRECISION, MAX_ANNUAL_RATE_PERCENT, MONTHS_PER_YEAR, PERCENT_DIVISOR,
};
use crate::errors::{Error, Result, ValidationError};

/// Computes the full level-payment schedule for a financed principal.
///
/// The annual nominal rate is converted to a monthly periodic rate
/// (`annual / 12 / 100`) and the installment follows the annuity formula
/// `principal * r / (1 - (1 + r)^-n)`. A zero rate degenerates to flat
/// amortization `principal / n`.
///
/// Pure and referentially transparent: same inputs, same schedule.
pub fn compute_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Result<AmortizationSchedule> {
    if principal <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Principal must be positive, got {}",
            principal
        ))));
    }
    if term_months == 0 {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Term must be at least one month".to_string(),
        )));
    }
    if annual_rate_percent < Decimal::ZERO || annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Annual rate must be between 0 and {} percent, got {}",
            MAX_ANNUAL_RATE_PERCENT, annual_rate_percent
        ))));
    }

    let periodic_rate = annual_rate_percent / MONTHS_PER_YEAR / PERCENT_DIVISOR;
    let installment =
        level_installment(principal, periodic_rate, term_months).round_dp(DECIMAL_PRECISION);

    let mut lines = Vec::with_capacity(term_months as usize);
    let mut opening_balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for installment_number in 1..=term_months {
        let interest_portion = (opening_balance * periodic_rate).round_dp(DECIMAL_PRECISION);

        // The last line absorbs the accumulated rounding residual so the
        // balance closes at exactly zero.
        let (installment_amount, principal_portion) = if installment_number == term_months {
            (opening_balance + interest_portion, opening_balance)
        } else {
            (installment, installment - interest_portion)
        };

        let closing_balance = opening_balance - principal_portion;

        lines.push(InstallmentLine {
            installment_number,
            opening_balance,
            installment_amount,
            principal_portion,
            interest_portion,
            closing_balance,
        });

        total_interest += interest_portion;
        total_paid += installment_amount;
        opening_balance = closing_balance;
    }

    Ok(AmortizationSchedule {
        lines,
        periodic_installment: installment,
        total_interest,
        total_paid,
    })
}

fn level_installment(principal: Decimal, periodic_rate: Decimal, term_months: u32) -> Decimal {
    if periodic_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }
    // (1 + r)^n kept positive to avoid negative-exponent powi
    let growth = (Decimal::ONE + periodic_rate).powi(term_months as i64);
    principal * periodic_rate * growth / (growth - Decimal::ONE)
}
