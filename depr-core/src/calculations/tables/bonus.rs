//! Bonus depreciation phase-down by placed-in-service year.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Placed-in-service year → bonus percentage. Years not listed get 0.
pub const BONUS_RATES: [(i32, Decimal); 6] = [
    (2022, dec!(1.00)),
    (2023, dec!(0.80)),
    (2024, dec!(0.60)),
    (2025, dec!(0.40)),
    (2026, dec!(0.20)),
    (2027, dec!(0.00)),
];

/// Bonus depreciation percentage for property placed in service in `year`.
///
/// ```
/// use depr_core::calculations::bonus_rate;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(bonus_rate(2024), dec!(0.60));
/// assert_eq!(bonus_rate(2030), Decimal::ZERO);
/// ```
pub fn bonus_rate(year: i32) -> Decimal {
    BONUS_RATES
        .iter()
        .find(|(rate_year, _)| *rate_year == year)
        .map(|(_, rate)| *rate)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn full_bonus_in_2022() {
        assert_eq!(bonus_rate(2022), dec!(1.00));
    }

    #[test]
    fn phase_down_is_twenty_points_per_year() {
        for window in BONUS_RATES.windows(2) {
            let [(_, earlier), (_, later)] = window else {
                unreachable!("windows(2) yields pairs");
            };

            assert_eq!(*earlier - *later, dec!(0.20));
        }
    }

    #[test]
    fn years_before_table_have_no_bonus() {
        assert_eq!(bonus_rate(2021), Decimal::ZERO);
        assert_eq!(bonus_rate(1999), Decimal::ZERO);
    }

    #[test]
    fn years_after_table_have_no_bonus() {
        assert_eq!(bonus_rate(2027), Decimal::ZERO);
        assert_eq!(bonus_rate(2028), Decimal::ZERO);
    }
}
