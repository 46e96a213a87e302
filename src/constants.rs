use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for schedule calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Fraction of the vehicle value used as the standard-scenario down payment
pub const STANDARD_DOWN_PAYMENT_RATE: Decimal = dec!(0.20);

/// Default ceiling for the max-term scenario
pub const DEFAULT_MAX_TERM_MONTHS: u32 = 84;

/// Months per year for nominal-to-periodic rate conversion
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Divisor converting a percentage to a fraction
pub const PERCENT_DIVISOR: Decimal = dec!(100);

/// Highest accepted annual nominal rate, in percent
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(100);
