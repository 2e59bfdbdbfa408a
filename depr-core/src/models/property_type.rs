use serde::{Deserialize, Serialize};

use super::AssetCategory;

/// Use of the building, which selects the active long-life category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Commercial,
    Residential,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Residential => "residential",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "commercial" => Some(Self::Commercial),
            "residential" => Some(Self::Residential),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::Residential => "Residential Rental",
        }
    }

    /// The building-structure category depreciated for this property type.
    pub fn building_category(&self) -> AssetCategory {
        match self {
            Self::Commercial => AssetCategory::Commercial,
            Self::Residential => AssetCategory::Residential,
        }
    }

    /// The building category that does not apply to this property type.
    pub fn inactive_category(&self) -> AssetCategory {
        match self {
            Self::Commercial => AssetCategory::Residential,
            Self::Residential => AssetCategory::Commercial,
        }
    }

    /// Categories that take part in a schedule, in display order.
    pub fn active_categories(&self) -> [AssetCategory; 5] {
        [
            AssetCategory::Land,
            AssetCategory::FiveYear,
            AssetCategory::SevenYear,
            AssetCategory::FifteenYear,
            self.building_category(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn commercial_uses_thirty_nine_year_building() {
        let active = PropertyType::Commercial.active_categories();

        assert_eq!(active[4], AssetCategory::Commercial);
        assert!(!active.contains(&AssetCategory::Residential));
    }

    #[test]
    fn residential_uses_twenty_seven_and_a_half_year_building() {
        let active = PropertyType::Residential.active_categories();

        assert_eq!(active[4], AssetCategory::Residential);
        assert!(!active.contains(&AssetCategory::Commercial));
    }

    #[test]
    fn inactive_category_is_the_other_building() {
        assert_eq!(
            PropertyType::Commercial.inactive_category(),
            AssetCategory::Residential
        );
        assert_eq!(
            PropertyType::Residential.inactive_category(),
            AssetCategory::Commercial
        );
    }

    #[test]
    fn parse_rejects_mixed_use() {
        assert_eq!(PropertyType::parse("mixed"), None);
        assert_eq!(
            PropertyType::parse("residential"),
            Some(PropertyType::Residential)
        );
    }
}
