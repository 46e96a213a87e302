mod amortization_calculator;
mod amortization_model;

pub use amortization_calculator::compute_schedule;
pub use amortization_model::{AmortizationSchedule, InstallmentLine};
