use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use depr_core::{ScheduleEngine, ScheduleSummary};
use depr_data::{ScenarioLoader, ScheduleExporter};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Compute depreciation schedules for every scenario in a CSV file.
///
/// The CSV file should have the following columns:
/// - name: Scenario label, also used for output file names
/// - total_cost: Purchase price
/// - placed_in_service: Date placed in service (YYYY-MM-DD)
/// - property_type: commercial or residential
/// - method: macrs or straight-line
/// - land, five_year, seven_year, fifteen_year, residential, commercial:
///   Allocation percentages (empty for 0)
/// - section_179_amount: Section 179 request (empty for no election)
/// - bonus: Elect bonus depreciation (true/false)
///
/// For each scenario two files are written to the output directory:
/// `<name>-schedule.csv` and `<name>-categories.csv`.
#[derive(Parser, Debug)]
#[command(name = "depr-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing property scenarios
    #[arg(short, long)]
    file: PathBuf,

    /// Directory to write schedule CSV files into
    #[arg(short, long, default_value = "schedules")]
    out_dir: PathBuf,

    /// Number of calendar years in each schedule
    #[arg(long, default_value_t = depr_core::calculations::SCHEDULE_HORIZON_YEARS)]
    horizon: usize,

    /// Log each pipeline step
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

/// Lowercase file stem with anything outside `[a-z0-9]` collapsed to `-`.
fn file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "scenario".to_string()
    } else {
        stem.to_string()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("Loading scenarios from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let scenarios = ScenarioLoader::load(file)
        .with_context(|| format!("Failed to load scenarios: {}", args.file.display()))?;

    println!("Parsed {} scenarios from CSV", scenarios.len());

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create: {}", args.out_dir.display()))?;

    let engine = ScheduleEngine::with_horizon(args.horizon);

    for (idx, scenario) in scenarios.iter().enumerate() {
        debug!(scenario = %scenario.name, "computing schedule");
        let schedule = engine.calculate(&scenario.inputs);
        let summary = ScheduleSummary::from_schedule(&schedule);

        let stem = format!("{:02}-{}", idx + 1, file_stem(&scenario.name));
        let schedule_path = args.out_dir.join(format!("{stem}-schedule.csv"));
        let categories_path = args.out_dir.join(format!("{stem}-categories.csv"));

        ScheduleExporter::write_schedule_file(&schedule, &schedule_path)
            .with_context(|| format!("Failed to write: {}", schedule_path.display()))?;
        ScheduleExporter::write_category_summary_file(&schedule, &categories_path)
            .with_context(|| format!("Failed to write: {}", categories_path.display()))?;

        info!(
            scenario = %scenario.name,
            first_year = %summary.first_year_total,
            total = %summary.total_depreciation,
            "schedule written"
        );
    }

    println!(
        "Successfully wrote {} schedules to {}",
        scenarios.len(),
        args.out_dir.display()
    );

    Ok(())
}
