use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AllocationMap, AssetCategory, DepreciationMethod, PropertyType};

/// Errors reported by [`PropertyInputs::validate`].
///
/// The schedule engine never raises these itself; it computes on whatever
/// it is given. Callers that accept user input validate first.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertyInputsError {
    #[error("total cost must be non-negative, got {0}")]
    NegativeTotalCost(Decimal),

    #[error("allocation for {category} must be between 0 and 100, got {percent}")]
    AllocationOutOfRange {
        category: AssetCategory,
        percent: Decimal,
    },

    #[error("section 179 amount must be non-negative, got {0}")]
    NegativeSection179Amount(Decimal),
}

/// Everything the schedule engine needs to know about one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInputs {
    /// Purchase price including improvements.
    pub total_cost: Decimal,

    /// Date the property was placed in service. Only the year is used.
    pub placed_in_service: NaiveDate,

    pub property_type: PropertyType,

    /// Cost-segregation split, as percentages of `total_cost`.
    pub allocations: AllocationMap,

    pub method: DepreciationMethod,

    /// Whether a Section 179 deduction is elected.
    pub use_section_179: bool,

    /// Requested Section 179 deduction. Only consulted when
    /// `use_section_179` is set.
    pub section_179_amount: Decimal,

    /// Whether bonus depreciation is elected.
    pub use_bonus_depreciation: bool,
}

impl PropertyInputs {
    /// Calendar year the schedule starts in.
    pub fn service_year(&self) -> i32 {
        self.placed_in_service.year()
    }

    /// Section 179 amount the engine should try to deduct; zero when the
    /// election is off.
    pub fn elected_section_179(&self) -> Decimal {
        if self.use_section_179 {
            self.section_179_amount
        } else {
            Decimal::ZERO
        }
    }

    /// Checks the input ranges a form would enforce.
    ///
    /// An allocation sum other than 100 is not an error; see
    /// [`AllocationMap::is_balanced`].
    ///
    /// # Errors
    ///
    /// Returns [`PropertyInputsError`] if:
    /// - `total_cost` is negative
    /// - any allocation is outside [0, 100]
    /// - `section_179_amount` is negative while the election is on
    pub fn validate(&self) -> Result<(), PropertyInputsError> {
        if self.total_cost < Decimal::ZERO {
            return Err(PropertyInputsError::NegativeTotalCost(self.total_cost));
        }
        if let Some((category, percent)) = self
            .allocations
            .iter()
            .find(|(_, percent)| *percent < Decimal::ZERO || *percent > dec!(100))
        {
            return Err(PropertyInputsError::AllocationOutOfRange { category, percent });
        }
        if self.use_section_179 && self.section_179_amount < Decimal::ZERO {
            return Err(PropertyInputsError::NegativeSection179Amount(
                self.section_179_amount,
            ));
        }
        Ok(())
    }
}
