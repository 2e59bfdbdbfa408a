use std::io::Read;

use chrono::NaiveDate;
use depr_core::{
    AllocationMap, AssetCategory, DepreciationMethod, PropertyInputs, PropertyInputsError,
    PropertyType,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading property scenarios.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unrecognised property type '{value}' on row {row}")]
    InvalidPropertyType { value: String, row: usize },

    #[error("unrecognised depreciation method '{value}' on row {row}")]
    InvalidMethod { value: String, row: usize },

    #[error("invalid inputs on row {row}: {source}")]
    InvalidInputs {
        row: usize,
        #[source]
        source: PropertyInputsError,
    },
}

impl From<csv::Error> for ScenarioLoadError {
    fn from(err: csv::Error) -> Self {
        ScenarioLoadError::CsvParse(err.to_string())
    }
}

/// A single row of the scenarios CSV file.
///
/// - `name`: label used for reports and output file names
/// - `total_cost`: purchase price
/// - `placed_in_service`: ISO date, e.g. `2024-03-01`
/// - `property_type`: `commercial` or `residential`
/// - `method`: `macrs` or `straight-line`
/// - `land` … `commercial`: allocation percentages (empty for 0)
/// - `section_179_amount`: Section 179 request (empty for no election)
/// - `bonus`: `true`/`false` (also `yes`/`no`, `1`/`0`; empty for false)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioRecord {
    pub name: String,
    pub total_cost: Decimal,
    pub placed_in_service: NaiveDate,
    pub property_type: String,
    pub method: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub land: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub five_year: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub seven_year: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub fifteen_year: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub residential: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub commercial: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub section_179_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub bonus: bool,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if ["true", "yes", "y", "1"].contains(&v.to_ascii_lowercase().as_str()) => Ok(true),
        Some(v) if ["false", "no", "n", "0"].contains(&v.to_ascii_lowercase().as_str()) => Ok(false),
        Some(v) => Err(serde::de::Error::custom(format!("invalid flag '{v}'"))),
    }
}

/// A named property ready for the schedule engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub inputs: PropertyInputs,
}

impl ScenarioRecord {
    fn allocations(&self) -> AllocationMap {
        [
            (AssetCategory::Land, self.land),
            (AssetCategory::FiveYear, self.five_year),
            (AssetCategory::SevenYear, self.seven_year),
            (AssetCategory::FifteenYear, self.fifteen_year),
            (AssetCategory::Residential, self.residential),
            (AssetCategory::Commercial, self.commercial),
        ]
        .into_iter()
        .filter_map(|(category, percent)| percent.map(|p| (category, p)))
        .collect()
    }

    /// Converts the record into validated engine inputs.
    ///
    /// `row` is 1-based and only used in error messages.
    pub fn into_scenario(
        self,
        row: usize,
    ) -> Result<Scenario, ScenarioLoadError> {
        let property_type = PropertyType::parse(self.property_type.trim()).ok_or_else(|| {
            ScenarioLoadError::InvalidPropertyType {
                value: self.property_type.clone(),
                row,
            }
        })?;
        let method = DepreciationMethod::parse(self.method.trim()).ok_or_else(|| {
            ScenarioLoadError::InvalidMethod {
                value: self.method.clone(),
                row,
            }
        })?;

        let inputs = PropertyInputs {
            total_cost: self.total_cost,
            placed_in_service: self.placed_in_service,
            property_type,
            allocations: self.allocations(),
            method,
            use_section_179: self.section_179_amount.is_some(),
            section_179_amount: self.section_179_amount.unwrap_or(Decimal::ZERO),
            use_bonus_depreciation: self.bonus,
        };
        inputs
            .validate()
            .map_err(|source| ScenarioLoadError::InvalidInputs { row, source })?;

        Ok(Scenario {
            name: self.name,
            inputs,
        })
    }
}

/// Loader for property scenarios from CSV files.
///
/// Headers are matched by name, so column order does not matter and
/// allocation columns that are always zero may be left out.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Parse raw scenario records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScenarioRecord>, ScenarioLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScenarioRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and convert every row, stopping at the first bad row.
    pub fn load<R: Read>(reader: R) -> Result<Vec<Scenario>, ScenarioLoadError> {
        let scenarios = Self::parse(reader)?
            .into_iter()
            .enumerate()
            .map(|(idx, record)| record.into_scenario(idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = scenarios.len(), "loaded scenarios");
        Ok(scenarios)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "name,total_cost,placed_in_service,property_type,method,land,five_year,seven_year,fifteen_year,residential,commercial,section_179_amount,bonus";

    fn csv_with(rows: &[&str]) -> String {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv
    }

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn test_parse_full_row() {
        let csv = csv_with(&["Office,1000000,2024-01-15,commercial,macrs,15,8,5,12,,60,100000,true"]);

        let records = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            ScenarioRecord {
                name: "Office".to_string(),
                total_cost: dec!(1000000),
                placed_in_service: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                property_type: "commercial".to_string(),
                method: "macrs".to_string(),
                land: Some(dec!(15)),
                five_year: Some(dec!(8)),
                seven_year: Some(dec!(5)),
                fifteen_year: Some(dec!(12)),
                residential: None,
                commercial: Some(dec!(60)),
                section_179_amount: Some(dec!(100000)),
                bonus: true,
            }
        );
    }

    #[test]
    fn test_parse_missing_optional_columns() {
        let csv = "name,total_cost,placed_in_service,property_type,method,land,residential\n\
                   Duplex,450000,2023-06-01,residential,straight-line,20,80";

        let records = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].five_year, None);
        assert_eq!(records[0].section_179_amount, None);
        assert!(!records[0].bonus);
    }

    #[test]
    fn test_parse_flag_spellings() {
        let csv = csv_with(&[
            "A,1,2024-01-01,commercial,macrs,,,,,,,,yes",
            "B,1,2024-01-01,commercial,macrs,,,,,,,,NO",
            "C,1,2024-01-01,commercial,macrs,,,,,,,,1",
        ]);

        let records = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let flags: Vec<_> = records.iter().map(|r| r.bonus).collect();

        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_parse_invalid_flag() {
        let csv = csv_with(&["A,1,2024-01-01,commercial,macrs,,,,,,,,maybe"]);

        let err = ScenarioLoader::parse(csv.as_bytes()).expect_err("Should reject flag");

        let ScenarioLoadError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("invalid flag"), "got: {msg}");
    }

    #[test]
    fn test_parse_invalid_date() {
        let csv = csv_with(&["A,1,2024-13-01,commercial,macrs,,,,,,,,"]);

        let result = ScenarioLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ScenarioLoadError::CsvParse(_))));
    }

    #[test]
    fn test_parse_missing_required_column() {
        let csv = "name,total_cost\nA,1";

        let err = ScenarioLoader::parse(csv.as_bytes()).expect_err("Should fail");

        let ScenarioLoadError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {msg}");
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = ScenarioLoader::parse(HEADER.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // load tests
    // =========================================================================

    #[test]
    fn test_load_builds_property_inputs() {
        let csv = csv_with(&["Office,1000000,2024-01-15,commercial,macrs,15,8,5,12,,60,,true"]);

        let scenarios = ScenarioLoader::load(csv.as_bytes()).expect("Failed to load");
        let inputs = &scenarios[0].inputs;

        assert_eq!(scenarios[0].name, "Office");
        assert_eq!(inputs.property_type, PropertyType::Commercial);
        assert_eq!(inputs.method, DepreciationMethod::Macrs);
        assert_eq!(inputs.allocations.get(AssetCategory::FifteenYear), dec!(12));
        assert_eq!(inputs.allocations.get(AssetCategory::Residential), Decimal::ZERO);
        assert!(inputs.allocations.is_balanced());
        assert!(!inputs.use_section_179);
        assert!(inputs.use_bonus_depreciation);
    }

    #[test]
    fn test_load_section_179_cell_enables_election() {
        let csv = csv_with(&["Office,1000000,2024-01-15,commercial,macrs,15,8,5,12,,60,75000,false"]);

        let scenarios = ScenarioLoader::load(csv.as_bytes()).expect("Failed to load");

        assert!(scenarios[0].inputs.use_section_179);
        assert_eq!(scenarios[0].inputs.section_179_amount, dec!(75000));
    }

    #[test]
    fn test_load_reports_row_of_bad_property_type() {
        let csv = csv_with(&[
            "Good,1,2024-01-01,commercial,macrs,,,,,,100,,",
            "Bad,1,2024-01-01,industrial,macrs,,,,,,100,,",
        ]);

        let result = ScenarioLoader::load(csv.as_bytes());

        assert_eq!(
            result,
            Err(ScenarioLoadError::InvalidPropertyType {
                value: "industrial".to_string(),
                row: 2,
            })
        );
    }

    #[test]
    fn test_load_reports_bad_method() {
        let csv = csv_with(&["A,1,2024-01-01,commercial,ads,,,,,,100,,"]);

        let err = ScenarioLoader::load(csv.as_bytes()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "unrecognised depreciation method 'ads' on row 1"
        );
    }

    #[test]
    fn test_load_rejects_out_of_range_allocation() {
        let csv = csv_with(&["A,1000,2024-01-01,commercial,macrs,,120,,,,,,"]);

        let result = ScenarioLoader::load(csv.as_bytes());

        assert_eq!(
            result,
            Err(ScenarioLoadError::InvalidInputs {
                row: 1,
                source: PropertyInputsError::AllocationOutOfRange {
                    category: AssetCategory::FiveYear,
                    percent: dec!(120),
                },
            })
        );
    }

    #[test]
    fn test_load_accepts_unbalanced_allocation() {
        let csv = csv_with(&["A,1000,2024-01-01,commercial,macrs,10,10,,,,10,,"]);

        let scenarios = ScenarioLoader::load(csv.as_bytes()).expect("Failed to load");

        assert_eq!(scenarios[0].inputs.allocations.total_percent(), dec!(30));
    }
}
