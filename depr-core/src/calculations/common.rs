//! Common utility functions for depreciation calculations.
//!
//! Shared money arithmetic used by the schedule engine and its summary
//! queries.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use depr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(15384.615384)), dec!(15384.62));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use depr_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-250.00)), Decimal::ZERO);
/// assert_eq!(non_negative(dec!(250.00)), dec!(250.00));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Applies a 0–100 percentage to an amount without rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use depr_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(1000000), dec!(8)), dec!(80000));
/// ```
pub fn percent_of(
    amount: Decimal,
    percent: Decimal,
) -> Decimal {
    amount * percent / dec!(100)
}
