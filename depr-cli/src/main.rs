use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use depr_cli::config::{ConfigOverrides, EstimatorConfig};
use depr_cli::logging::init_logging;
use depr_cli::report::{OutputFormat, ScheduleReport, allocation_advisory};
use depr_cli::utils::parse_decimal;
use depr_core::{AssetCategory, DepreciationMethod, PropertyType, ScheduleEngine};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Cost-segregation depreciation estimator.
///
/// Builds a year-by-year depreciation schedule for one property from a
/// TOML config, command-line flags, or both. Flags win over the config.
#[derive(Debug, Parser)]
#[command(name = "depr-estimator", version, about)]
struct Cli {
    /// TOML file describing the property.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total cost, e.g. `1,250,000`.
    #[arg(long, value_parser = parse_decimal)]
    cost: Option<Decimal>,

    /// Date placed in service (YYYY-MM-DD).
    #[arg(long)]
    placed_in_service: Option<NaiveDate>,

    /// `commercial` or `residential`.
    #[arg(long, value_parser = parse_property_type)]
    property_type: Option<PropertyType>,

    /// `macrs` or `straight-line`.
    #[arg(long, value_parser = parse_method)]
    method: Option<DepreciationMethod>,

    /// Allocation override as CATEGORY=PERCENT, e.g. `five_year=8`.
    /// May be repeated.
    #[arg(long = "alloc", value_parser = parse_allocation)]
    allocations: Vec<(AssetCategory, Decimal)>,

    /// Elect Section 179 with this requested amount.
    #[arg(long = "section-179", value_parser = parse_decimal, conflicts_with = "no_section_179")]
    section_179: Option<Decimal>,

    /// Turn off a Section 179 election made in the config.
    #[arg(long)]
    no_section_179: bool,

    /// Elect bonus depreciation.
    #[arg(long, conflicts_with = "no_bonus")]
    bonus: bool,

    /// Turn off a bonus election made in the config.
    #[arg(long)]
    no_bonus: bool,

    /// Number of calendar years in the schedule.
    #[arg(long)]
    horizon: Option<usize>,

    /// Report format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log each pipeline step.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let bonus = match (self.bonus, self.no_bonus) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ConfigOverrides {
            total_cost: self.cost,
            placed_in_service: self.placed_in_service,
            property_type: self.property_type,
            method: self.method,
            horizon_years: self.horizon,
            allocations: self.allocations.clone(),
            section_179_amount: self.section_179,
            no_section_179: self.no_section_179,
            bonus,
        }
    }
}

// ─── argument parsers ────────────────────────────────────────────────────────

fn parse_property_type(s: &str) -> Result<PropertyType, String> {
    PropertyType::parse(&s.trim().to_ascii_lowercase())
        .ok_or_else(|| format!("unknown property type '{s}' (expected commercial or residential)"))
}

fn parse_method(s: &str) -> Result<DepreciationMethod, String> {
    DepreciationMethod::parse(&s.trim().to_ascii_lowercase())
        .ok_or_else(|| format!("unknown method '{s}' (expected macrs or straight-line)"))
}

fn parse_allocation(s: &str) -> Result<(AssetCategory, Decimal), String> {
    let (name, percent) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=PERCENT, got '{s}'"))?;
    let category = AssetCategory::parse(name.trim())
        .ok_or_else(|| format!("unknown category '{}'", name.trim()))?;
    let percent = parse_decimal(percent.trim_end_matches('%')).map_err(|e| e.to_string())?;
    Ok((category, percent))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = EstimatorConfig::load(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load config: {}", path.display()),
            None => "Failed to load default config".to_string(),
        }
    })?;
    config.apply(&cli.overrides());
    debug!(?config, "effective configuration");

    let inputs = config.to_inputs().context("Invalid property inputs")?;
    if let Some(advisory) = allocation_advisory(&inputs.allocations) {
        warn!("{advisory}");
    }

    let engine = ScheduleEngine::with_horizon(config.horizon_years);
    let schedule = engine.calculate(&inputs);
    let report = ScheduleReport::new(&inputs, &schedule);

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            report
                .write(cli.format, &mut writer)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            writer
                .flush()
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!(
                path = %path.display(),
                first_year = %report.summary().first_year_total,
                "report written"
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            report
                .write(cli.format, &mut handle)
                .context("Failed to write report")?;
        }
    }

    Ok(())
}
