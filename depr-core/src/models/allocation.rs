use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::AssetCategory;

const FULL_ALLOCATION: Decimal = dec!(100);

/// Percentage (0–100) of total cost assigned to each category.
///
/// Categories without an entry are treated as 0%. The percentages are
/// conventionally expected to sum to 100, but nothing here enforces it;
/// callers can check [`AllocationMap::is_balanced`] and warn.
///
/// ```
/// use depr_core::{AllocationMap, AssetCategory};
/// use rust_decimal_macros::dec;
///
/// let allocations = AllocationMap::new()
///     .with(AssetCategory::Land, dec!(20))
///     .with(AssetCategory::Commercial, dec!(70));
///
/// assert_eq!(allocations.total_percent(), dec!(90));
/// assert_eq!(allocations.unallocated_percent(), dec!(10));
/// assert!(!allocations.is_balanced());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationMap(BTreeMap<AssetCategory, Decimal>);

impl AllocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`AllocationMap::set`].
    pub fn with(
        mut self,
        category: AssetCategory,
        percent: Decimal,
    ) -> Self {
        self.set(category, percent);
        self
    }

    /// Sets the percentage for a category, replacing any previous value.
    pub fn set(
        &mut self,
        category: AssetCategory,
        percent: Decimal,
    ) {
        self.0.insert(category, percent);
    }

    /// Percentage for a category, 0 when absent.
    pub fn get(
        &self,
        category: AssetCategory,
    ) -> Decimal {
        self.0.get(&category).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetCategory, Decimal)> + '_ {
        self.0.iter().map(|(category, percent)| (*category, *percent))
    }

    /// Sum of every entry, including categories the property type ignores.
    pub fn total_percent(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Sum restricted to the given categories.
    pub fn total_percent_of(
        &self,
        categories: &[AssetCategory],
    ) -> Decimal {
        categories.iter().map(|c| self.get(*c)).sum()
    }

    /// How far the total falls short of 100 (negative when over-allocated).
    pub fn unallocated_percent(&self) -> Decimal {
        FULL_ALLOCATION - self.total_percent()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_percent() == FULL_ALLOCATION
    }
}

impl FromIterator<(AssetCategory, Decimal)> for AllocationMap {
    fn from_iter<I: IntoIterator<Item = (AssetCategory, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
