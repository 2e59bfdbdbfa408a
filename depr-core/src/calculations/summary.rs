//! Summary figures derived from a computed schedule.
//!
//! Everything here is a reduction over [`DepreciationSchedule`] rows or
//! category state; nothing is cached on the schedule itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AssetCategory;
use crate::calculations::common::round_half_up;
use crate::calculations::schedule::DepreciationSchedule;

impl DepreciationSchedule {
    /// Total deduction in the placed-in-service year.
    pub fn first_year_total(&self) -> Decimal {
        self.total_for_years(1)
    }

    /// Total deduction over the first `years` schedule years.
    pub fn total_for_years(
        &self,
        years: usize,
    ) -> Decimal {
        self.rows.iter().take(years).map(|row| row.total).sum()
    }

    /// Total deduction over the whole horizon.
    pub fn total_depreciation(&self) -> Decimal {
        self.total_for_years(self.rows.len())
    }

    /// Total deduction for one category over the whole horizon.
    pub fn category_total(
        &self,
        category: AssetCategory,
    ) -> Decimal {
        self.category(category)
            .map(|basis| basis.cumulative_depreciation)
            .unwrap_or(Decimal::ZERO)
    }

    /// Total cost less the land allocation.
    pub fn total_depreciable_basis(&self) -> Decimal {
        let land = self
            .category(AssetCategory::Land)
            .map(|basis| basis.initial_basis)
            .unwrap_or(Decimal::ZERO);
        self.total_cost - land
    }

    pub fn section_179_total(&self) -> Decimal {
        self.categories.iter().map(|c| c.section_179_amount).sum()
    }

    pub fn bonus_total(&self) -> Decimal {
        self.categories.iter().map(|c| c.bonus_amount).sum()
    }

    /// Calendar year of the last row with a non-zero deduction.
    pub fn last_deduction_year(&self) -> Option<i32> {
        self.rows
            .iter()
            .rev()
            .find(|row| row.total != Decimal::ZERO)
            .map(|row| row.year)
    }
}

/// Headline figures shown next to a schedule, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub first_year_total: Decimal,
    pub five_year_total: Decimal,
    pub ten_year_total: Decimal,
    pub total_depreciation: Decimal,
    pub total_depreciable_basis: Decimal,
    pub section_179_total: Decimal,
    pub bonus_total: Decimal,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &DepreciationSchedule) -> Self {
        Self {
            first_year_total: round_half_up(schedule.first_year_total()),
            five_year_total: round_half_up(schedule.total_for_years(5)),
            ten_year_total: round_half_up(schedule.total_for_years(10)),
            total_depreciation: round_half_up(schedule.total_depreciation()),
            total_depreciable_basis: round_half_up(schedule.total_depreciable_basis()),
            section_179_total: round_half_up(schedule.section_179_total()),
            bonus_total: round_half_up(schedule.bonus_total()),
        }
    }
}
