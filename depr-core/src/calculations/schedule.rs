//! Multi-year depreciation schedule for a cost-segregated property.
//!
//! # Pipeline
//!
//! The steps run in a fixed order, because each one shrinks the basis the
//! next one sees:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Allocate total cost to each active category by percentage |
//! | 2    | Section 179: absorb the election 5-year → 7-year → 15-year, each capped at its basis |
//! | 3    | Bonus: post-179 basis × bonus rate for the service year, per eligible category |
//! | 4    | Periodic: MACRS table rate or straight-line over the life, on the remaining basis |
//! | 5    | Year 0 also takes the category's Section 179 and bonus amounts |
//! | 6    | Accumulate per-category running totals and per-year totals |
//!
//! Land is carried through every step with a zero life and never
//! depreciates. The building category that does not match the property
//! type is left out of the schedule entirely.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use depr_core::{
//!     AllocationMap, AssetCategory, DepreciationMethod, PropertyInputs, PropertyType,
//!     compute_schedule,
//! };
//!
//! let inputs = PropertyInputs {
//!     total_cost: dec!(1000000),
//!     placed_in_service: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     property_type: PropertyType::Commercial,
//!     allocations: AllocationMap::new()
//!         .with(AssetCategory::Land, dec!(15))
//!         .with(AssetCategory::FiveYear, dec!(8))
//!         .with(AssetCategory::SevenYear, dec!(5))
//!         .with(AssetCategory::FifteenYear, dec!(12))
//!         .with(AssetCategory::Commercial, dec!(60)),
//!     method: DepreciationMethod::Macrs,
//!     use_section_179: false,
//!     section_179_amount: dec!(0),
//!     use_bonus_depreciation: true,
//! };
//!
//! let schedule = compute_schedule(&inputs);
//! let five_year = schedule.category(AssetCategory::FiveYear).unwrap();
//!
//! assert_eq!(five_year.initial_basis, dec!(80000));
//! assert_eq!(five_year.bonus_amount, dec!(48000));
//! assert_eq!(five_year.remaining_basis, dec!(32000));
//! assert_eq!(schedule.rows[0].amount(AssetCategory::FiveYear), dec!(54400));
//! assert_eq!(schedule.rows.len(), 40);
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, percent_of};
use crate::calculations::tables::{MacrsTable, bonus_rate};
use crate::{AssetCategory, DepreciationMethod, PropertyInputs, PropertyType};

/// Number of calendar years a schedule covers by default.
pub const SCHEDULE_HORIZON_YEARS: usize = 40;

/// Per-category state carried through one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBasis {
    pub category: AssetCategory,

    /// Share of total cost allocated to this category (0–100).
    pub allocation_percent: Decimal,

    /// Allocated basis before any deductions.
    pub initial_basis: Decimal,

    /// Section 179 deduction absorbed by this category.
    pub section_179_amount: Decimal,

    /// Bonus depreciation taken on the post-179 basis.
    pub bonus_amount: Decimal,

    /// Basis left for periodic depreciation after Section 179 and bonus.
    pub remaining_basis: Decimal,

    /// Everything deducted over the schedule, including year-0 add-ons.
    pub cumulative_depreciation: Decimal,

    /// Deduction for each schedule year, year 0 first.
    pub yearly_depreciation: Vec<Decimal>,
}

impl CategoryBasis {
    fn allocated(
        category: AssetCategory,
        allocation_percent: Decimal,
        total_cost: Decimal,
    ) -> Self {
        let initial_basis = percent_of(total_cost, allocation_percent);
        Self {
            category,
            allocation_percent,
            initial_basis,
            section_179_amount: Decimal::ZERO,
            bonus_amount: Decimal::ZERO,
            remaining_basis: initial_basis,
            cumulative_depreciation: Decimal::ZERO,
            yearly_depreciation: Vec::new(),
        }
    }

    /// Year-0 deduction: periodic amount plus Section 179 and bonus.
    pub fn first_year_total(&self) -> Decimal {
        self.yearly_depreciation
            .first()
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Section 179 plus bonus.
    pub fn accelerated_total(&self) -> Decimal {
        self.section_179_amount + self.bonus_amount
    }

    /// Deductions from the MACRS table or straight-line only.
    pub fn periodic_total(&self) -> Decimal {
        self.cumulative_depreciation - self.accelerated_total()
    }
}

/// One calendar year of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: i32,

    /// Deduction per active category for this year.
    pub amounts: BTreeMap<AssetCategory, Decimal>,

    /// Sum of `amounts`.
    pub total: Decimal,
}

impl ScheduleYear {
    /// Deduction for a category, 0 if the category is not in the schedule.
    pub fn amount(
        &self,
        category: AssetCategory,
    ) -> Decimal {
        self.amounts.get(&category).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Result of a schedule computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub placed_in_service_year: i32,

    /// Cost the basis was allocated from. Negative input costs are
    /// recorded as zero.
    pub total_cost: Decimal,

    pub property_type: PropertyType,

    pub method: DepreciationMethod,

    /// Bonus rate actually applied; zero when not elected.
    pub bonus_rate: Decimal,

    /// One row per calendar year, starting at the placed-in-service year.
    pub rows: Vec<ScheduleYear>,

    /// Final per-category state, in display order.
    pub categories: Vec<CategoryBasis>,
}

impl DepreciationSchedule {
    pub fn category(
        &self,
        category: AssetCategory,
    ) -> Option<&CategoryBasis> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Calculator for depreciation schedules.
///
/// Holds only the horizon length; rate tables are static. A single engine
/// can be reused for any number of computations, including from several
/// threads at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEngine {
    horizon_years: usize,
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self {
            horizon_years: SCHEDULE_HORIZON_YEARS,
        }
    }
}

impl ScheduleEngine {
    /// Creates an engine with the standard 40-year horizon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that emits `horizon_years` rows.
    pub fn with_horizon(horizon_years: usize) -> Self {
        Self { horizon_years }
    }

    pub fn horizon_years(&self) -> usize {
        self.horizon_years
    }

    /// Computes the full schedule for one property.
    ///
    /// Never fails: zero or negative cost yields an all-zero schedule, an
    /// unbalanced allocation is computed as given, and a Section 179
    /// request larger than the eligible basis is capped.
    pub fn calculate(
        &self,
        inputs: &PropertyInputs,
    ) -> DepreciationSchedule {
        let service_year = inputs.service_year();
        let total_cost = non_negative(inputs.total_cost);

        // Step 1: allocation
        let mut categories = self.allocate_basis(inputs, total_cost);

        // Step 2: Section 179
        if inputs.use_section_179 {
            self.apply_section_179(&mut categories, inputs.section_179_amount);
        }

        // Step 3: bonus
        let bonus_rate = self.effective_bonus_rate(inputs);
        if bonus_rate > Decimal::ZERO {
            self.apply_bonus(&mut categories, bonus_rate);
        }

        // Steps 4–6: periodic depreciation and accumulation
        let rows = self.depreciate(&mut categories, inputs.method, service_year);

        DepreciationSchedule {
            placed_in_service_year: service_year,
            total_cost,
            property_type: inputs.property_type,
            method: inputs.method,
            bonus_rate,
            rows,
            categories,
        }
    }

    /// Builds the per-category accumulator from the allocation percentages.
    fn allocate_basis(
        &self,
        inputs: &PropertyInputs,
        total_cost: Decimal,
    ) -> Vec<CategoryBasis> {
        let active = inputs.property_type.active_categories();

        let allocated_percent = inputs.allocations.total_percent_of(&active);
        if !inputs.allocations.is_balanced() {
            warn!(
                total_percent = %inputs.allocations.total_percent(),
                "allocation percentages do not sum to 100; computing on the given split"
            );
        }

        let inactive = inputs.property_type.inactive_category();
        let ignored = inputs.allocations.get(inactive);
        if ignored != Decimal::ZERO {
            warn!(
                category = %inactive,
                percent = %ignored,
                property_type = inputs.property_type.as_str(),
                "allocation to a building category the property type does not use is ignored"
            );
        }

        debug!(
            total_cost = %total_cost,
            allocated_percent = %allocated_percent,
            "allocating basis"
        );

        active
            .into_iter()
            .map(|category| {
                CategoryBasis::allocated(category, inputs.allocations.get(category), total_cost)
            })
            .collect()
    }

    /// Absorbs the election in fixed category order, first come first served.
    ///
    /// Returns the total actually deducted.
    fn apply_section_179(
        &self,
        categories: &mut [CategoryBasis],
        elected: Decimal,
    ) -> Decimal {
        let mut remaining = non_negative(elected);

        for category in AssetCategory::SECTION_179_ORDER {
            if remaining <= Decimal::ZERO {
                break;
            }
            let Some(basis) = categories.iter_mut().find(|b| b.category == category) else {
                continue;
            };

            let deduction = remaining.min(non_negative(basis.remaining_basis));
            basis.section_179_amount = deduction;
            basis.remaining_basis -= deduction;
            remaining -= deduction;

            debug!(
                category = %category,
                deduction = %deduction,
                remaining = %remaining,
                "section 179 applied"
            );
        }

        if remaining > Decimal::ZERO {
            warn!(
                elected = %elected,
                unused = %remaining,
                "section 179 election exceeds eligible basis; excess is not deducted"
            );
        }

        non_negative(elected) - remaining
    }

    /// Bonus rate for the service year, or zero when not elected.
    fn effective_bonus_rate(
        &self,
        inputs: &PropertyInputs,
    ) -> Decimal {
        if !inputs.use_bonus_depreciation {
            return Decimal::ZERO;
        }

        let rate = bonus_rate(inputs.service_year());
        if rate <= Decimal::ZERO {
            warn!(
                service_year = inputs.service_year(),
                "bonus depreciation elected but no bonus rate applies to the service year"
            );
        }
        rate
    }

    /// Takes bonus on each eligible category's own post-179 basis.
    fn apply_bonus(
        &self,
        categories: &mut [CategoryBasis],
        rate: Decimal,
    ) {
        for basis in categories
            .iter_mut()
            .filter(|b| b.category.is_accelerated_eligible())
        {
            let bonus = non_negative(basis.remaining_basis) * rate;
            basis.bonus_amount = bonus;
            basis.remaining_basis -= bonus;

            debug!(
                category = %basis.category,
                rate = %rate,
                bonus = %bonus,
                "bonus depreciation applied"
            );
        }
    }

    /// Regular deduction for one category in one year, before add-ons.
    fn periodic_depreciation(
        &self,
        basis: &CategoryBasis,
        method: DepreciationMethod,
        year_index: usize,
    ) -> Decimal {
        let life = basis.category.recovery_life();
        if life <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match method {
            DepreciationMethod::Macrs => MacrsTable::for_life(life)
                .and_then(|table| table.rate(year_index))
                .map(|rate| basis.remaining_basis * rate)
                .unwrap_or(Decimal::ZERO),
            DepreciationMethod::StraightLine => {
                straight_line_amount(basis.remaining_basis, life, year_index)
            }
        }
    }

    /// Produces the yearly rows and fills each category's running totals.
    fn depreciate(
        &self,
        categories: &mut [CategoryBasis],
        method: DepreciationMethod,
        service_year: i32,
    ) -> Vec<ScheduleYear> {
        let mut rows = Vec::with_capacity(self.horizon_years);

        for (year_index, year) in (service_year..).take(self.horizon_years).enumerate() {
            let mut amounts = BTreeMap::new();

            for basis in categories.iter_mut() {
                let mut amount = self.periodic_depreciation(basis, method, year_index);
                if year_index == 0 {
                    amount += basis.accelerated_total();
                }

                basis.cumulative_depreciation += amount;
                basis.yearly_depreciation.push(amount);
                amounts.insert(basis.category, amount);
            }

            let total = amounts.values().copied().sum();
            rows.push(ScheduleYear {
                year,
                amounts,
                total,
            });
        }

        rows
    }
}

/// Even share of `basis` for `year_index`: `basis / life` while the index
/// is below the life, zero afterwards.
///
/// No stub-year proration: a 27.5-year life takes 28 full amounts
/// (indexes 0 through 27).
fn straight_line_amount(
    basis: Decimal,
    life: Decimal,
    year_index: usize,
) -> Decimal {
    if Decimal::from(year_index) < life {
        basis / life
    } else {
        Decimal::ZERO
    }
}

/// Computes a schedule with the default 40-year horizon.
pub fn compute_schedule(inputs: &PropertyInputs) -> DepreciationSchedule {
    ScheduleEngine::default().calculate(inputs)
}
