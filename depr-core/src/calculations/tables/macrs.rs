//! MACRS percentage-of-basis tables.
//!
//! The half-year tables (5, 7 and 15 year) are the IRS Publication 946
//! Table A-1 rates and run one year past the nominal life. The 27.5 and
//! 39 year tables approximate the mid-month convention for property placed
//! in service in January: a first-year stub, a constant full-year rate and
//! a final stub.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const FIVE_YEAR: [Decimal; 6] = [
    dec!(0.20),
    dec!(0.32),
    dec!(0.192),
    dec!(0.1152),
    dec!(0.1152),
    dec!(0.0576),
];

const SEVEN_YEAR: [Decimal; 8] = [
    dec!(0.1429),
    dec!(0.2449),
    dec!(0.1749),
    dec!(0.1249),
    dec!(0.0893),
    dec!(0.0892),
    dec!(0.0893),
    dec!(0.0446),
];

const FIFTEEN_YEAR: [Decimal; 16] = [
    dec!(0.05),
    dec!(0.095),
    dec!(0.0855),
    dec!(0.077),
    dec!(0.0693),
    dec!(0.0623),
    dec!(0.059),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.0295),
];

/// A single recovery-period table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacrsTable {
    /// Explicit per-year rates with the half-year convention built in.
    HalfYear(&'static [Decimal]),

    /// Mid-month approximation: `first` in year 0, `interior` in every
    /// year up to the last, `last` in the final year.
    MidMonth {
        first: Decimal,
        interior: Decimal,
        last: Decimal,
        len: usize,
    },
}

/// Recovery life → table. Lives not listed here have no MACRS table.
pub const MACRS_TABLES: [(Decimal, MacrsTable); 5] = [
    (dec!(5), MacrsTable::HalfYear(&FIVE_YEAR)),
    (dec!(7), MacrsTable::HalfYear(&SEVEN_YEAR)),
    (dec!(15), MacrsTable::HalfYear(&FIFTEEN_YEAR)),
    (
        dec!(27.5),
        MacrsTable::MidMonth {
            first: dec!(0.03485),
            interior: dec!(0.03636),
            last: dec!(0.01970),
            len: 28,
        },
    ),
    (
        dec!(39),
        MacrsTable::MidMonth {
            first: dec!(0.02461),
            interior: dec!(0.02564),
            last: dec!(0.00107),
            len: 40,
        },
    ),
];

impl MacrsTable {
    /// Table for a recovery life, if one exists.
    pub fn for_life(life: Decimal) -> Option<MacrsTable> {
        MACRS_TABLES
            .iter()
            .find(|(table_life, _)| *table_life == life)
            .map(|(_, table)| *table)
    }

    /// Number of years with a rate.
    pub fn len(&self) -> usize {
        match self {
            Self::HalfYear(rates) => rates.len(),
            Self::MidMonth { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rate for a 0-based year index, `None` past the end of the table.
    pub fn rate(
        &self,
        year_index: usize,
    ) -> Option<Decimal> {
        match *self {
            Self::HalfYear(rates) => rates.get(year_index).copied(),
            Self::MidMonth {
                first,
                interior,
                last,
                len,
            } => match year_index {
                i if i >= len => None,
                0 => Some(first),
                i if i == len - 1 => Some(last),
                _ => Some(interior),
            },
        }
    }

    /// Sum of every rate in the table.
    pub fn total(&self) -> Decimal {
        (0..self.len()).filter_map(|i| self.rate(i)).sum()
    }
}

/// Percentage of basis recovered in `year_index` for property with the
/// given recovery life.
///
/// Returns `None` when the life has no table or the index is past the end
/// of the table.
///
/// ```
/// use depr_core::calculations::macrs_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(macrs_rate(dec!(5), 0), Some(dec!(0.20)));
/// assert_eq!(macrs_rate(dec!(5), 6), None);
/// assert_eq!(macrs_rate(dec!(10), 0), None);
/// ```
pub fn macrs_rate(
    life: Decimal,
    year_index: usize,
) -> Option<Decimal> {
    MacrsTable::for_life(life).and_then(|table| table.rate(year_index))
}
