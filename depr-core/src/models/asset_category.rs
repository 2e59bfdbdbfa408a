use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Recovery lives that qualify for Section 179 expensing and bonus depreciation.
const ACCELERATED_LIVES: [Decimal; 3] = [dec!(5), dec!(7), dec!(15)];

/// One of the six cost-segregation buckets a property's cost can be split into.
///
/// Variants are declared in schedule display order, which is also the
/// ordering used for map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Land,
    FiveYear,
    SevenYear,
    FifteenYear,
    Residential,
    Commercial,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 6] = [
        Self::Land,
        Self::FiveYear,
        Self::SevenYear,
        Self::FifteenYear,
        Self::Residential,
        Self::Commercial,
    ];

    /// Fixed priority in which a Section 179 election is absorbed.
    pub const SECTION_179_ORDER: [AssetCategory; 3] =
        [Self::FiveYear, Self::SevenYear, Self::FifteenYear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::FiveYear => "five_year",
            Self::SevenYear => "seven_year",
            Self::FifteenYear => "fifteen_year",
            Self::Residential => "residential",
            Self::Commercial => "commercial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "land" => Some(Self::Land),
            "five_year" | "5" => Some(Self::FiveYear),
            "seven_year" | "7" => Some(Self::SevenYear),
            "fifteen_year" | "15" => Some(Self::FifteenYear),
            "residential" | "27.5" => Some(Self::Residential),
            "commercial" | "39" => Some(Self::Commercial),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Land => "Land",
            Self::FiveYear => "5-Year Property",
            Self::SevenYear => "7-Year Property",
            Self::FifteenYear => "15-Year Land Improvements",
            Self::Residential => "27.5-Year Residential Rental",
            Self::Commercial => "39-Year Nonresidential Real",
        }
    }

    /// Recovery period in years. Land is never depreciated and reports zero.
    pub fn recovery_life(&self) -> Decimal {
        match self {
            Self::Land => Decimal::ZERO,
            Self::FiveYear => dec!(5),
            Self::SevenYear => dec!(7),
            Self::FifteenYear => dec!(15),
            Self::Residential => dec!(27.5),
            Self::Commercial => dec!(39),
        }
    }

    pub fn is_depreciable(&self) -> bool {
        self.recovery_life() > Decimal::ZERO
    }

    /// Whether Section 179 and bonus depreciation may be taken against this
    /// category. Derived from the recovery life.
    pub fn is_accelerated_eligible(&self) -> bool {
        ACCELERATED_LIVES.contains(&self.recovery_life())
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_identifier() {
        for category in AssetCategory::ALL {
            assert_eq!(AssetCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn parse_accepts_recovery_life_shorthand() {
        assert_eq!(AssetCategory::parse("27.5"), Some(AssetCategory::Residential));
        assert_eq!(AssetCategory::parse("39"), Some(AssetCategory::Commercial));
    }

    #[test]
    fn parse_rejects_unknown_identifier() {
        assert_eq!(AssetCategory::parse("ten_year"), None);
    }

    #[test]
    fn land_is_not_depreciable() {
        assert!(!AssetCategory::Land.is_depreciable());
        assert_eq!(AssetCategory::Land.recovery_life(), Decimal::ZERO);
    }

    #[test]
    fn only_short_lived_categories_are_accelerated_eligible() {
        let eligible: Vec<_> = AssetCategory::ALL
            .into_iter()
            .filter(AssetCategory::is_accelerated_eligible)
            .collect();

        assert_eq!(eligible, AssetCategory::SECTION_179_ORDER.to_vec());
    }

    #[test]
    fn ordering_follows_declaration() {
        let mut shuffled = vec![
            AssetCategory::Commercial,
            AssetCategory::Land,
            AssetCategory::FifteenYear,
            AssetCategory::FiveYear,
        ];
        shuffled.sort();

        assert_eq!(
            shuffled,
            vec![
                AssetCategory::Land,
                AssetCategory::FiveYear,
                AssetCategory::FifteenYear,
                AssetCategory::Commercial,
            ]
        );
    }

    #[test]
    fn serializes_as_snake_case_identifier() {
        let json = serde_json::to_string(&AssetCategory::FifteenYear).unwrap();

        assert_eq!(json, "\"fifteen_year\"");
    }
}
