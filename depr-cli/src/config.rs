//! Estimator configuration.
//!
//! A TOML file describes one property; every field is optional and falls
//! back to the built-in example property. Command-line flags are applied
//! on top through [`ConfigOverrides`].
//!
//! ```toml
//! total_cost = 1000000
//! placed_in_service = "2024-01-01"
//! property_type = "commercial"
//! method = "macrs"
//! horizon_years = 40
//!
//! [allocations]
//! land = 15
//! five_year = 8
//! seven_year = 5
//! fifteen_year = 12
//! commercial = 60
//!
//! [section_179]
//! enabled = true
//! amount = 100000
//!
//! [bonus]
//! enabled = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use depr_core::calculations::SCHEDULE_HORIZON_YEARS;
use depr_core::{
    AllocationMap, AssetCategory, DepreciationMethod, PropertyInputs, PropertyInputsError,
    PropertyType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid property inputs: {0}")]
    Invalid(#[from] PropertyInputsError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Section179Config {
    pub enabled: bool,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BonusConfig {
    pub enabled: bool,
}

/// One property plus the schedule horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    pub total_cost: Decimal,
    pub placed_in_service: NaiveDate,
    pub property_type: PropertyType,
    pub method: DepreciationMethod,
    pub horizon_years: usize,
    pub allocations: AllocationMap,
    pub section_179: Section179Config,
    pub bonus: BonusConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            total_cost: dec!(1000000),
            placed_in_service: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            property_type: PropertyType::Commercial,
            method: DepreciationMethod::Macrs,
            horizon_years: SCHEDULE_HORIZON_YEARS,
            allocations: default_allocations(),
            section_179: Section179Config::default(),
            bonus: BonusConfig::default(),
        }
    }
}

/// Typical commercial cost-segregation split.
pub fn default_allocations() -> AllocationMap {
    AllocationMap::new()
        .with(AssetCategory::Land, dec!(15))
        .with(AssetCategory::FiveYear, dec!(8))
        .with(AssetCategory::SevenYear, dec!(5))
        .with(AssetCategory::FifteenYear, dec!(12))
        .with(AssetCategory::Commercial, dec!(60))
}

impl EstimatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads the config at `path`, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no config file given, using defaults");
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_toml_str(&contents)
    }

    pub fn apply(
        &mut self,
        overrides: &ConfigOverrides,
    ) {
        if let Some(total_cost) = overrides.total_cost {
            self.total_cost = total_cost;
        }
        if let Some(date) = overrides.placed_in_service {
            self.placed_in_service = date;
        }
        if let Some(property_type) = overrides.property_type {
            self.property_type = property_type;
        }
        if let Some(method) = overrides.method {
            self.method = method;
        }
        if let Some(horizon_years) = overrides.horizon_years {
            self.horizon_years = horizon_years;
        }
        for (category, percent) in &overrides.allocations {
            self.allocations.set(*category, *percent);
        }
        if let Some(amount) = overrides.section_179_amount {
            self.section_179.enabled = true;
            self.section_179.amount = amount;
        }
        if overrides.no_section_179 {
            self.section_179.enabled = false;
        }
        if let Some(enabled) = overrides.bonus {
            self.bonus.enabled = enabled;
        }
    }

    /// Builds validated engine inputs from the config.
    pub fn to_inputs(&self) -> Result<PropertyInputs, ConfigError> {
        let inputs = PropertyInputs {
            total_cost: self.total_cost,
            placed_in_service: self.placed_in_service,
            property_type: self.property_type,
            allocations: self.allocations.clone(),
            method: self.method,
            use_section_179: self.section_179.enabled,
            section_179_amount: self.section_179.amount,
            use_bonus_depreciation: self.bonus.enabled,
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

/// Values supplied on the command line; `None` keeps the config value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub total_cost: Option<Decimal>,
    pub placed_in_service: Option<NaiveDate>,
    pub property_type: Option<PropertyType>,
    pub method: Option<DepreciationMethod>,
    pub horizon_years: Option<usize>,
    pub allocations: Vec<(AssetCategory, Decimal)>,
    /// Setting an amount also turns the election on.
    pub section_179_amount: Option<Decimal>,
    pub no_section_179: bool,
    pub bonus: Option<bool>,
}
