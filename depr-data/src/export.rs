use std::fs::File;
use std::io::Write;
use std::path::Path;

use depr_core::calculations::common::round_half_up;
use depr_core::{AssetCategory, DepreciationSchedule};
use rust_decimal::Decimal;
use thiserror::Error;

/// Formats an amount to exactly two decimal places.
fn cents(amount: Decimal) -> String {
    format!("{:.2}", round_half_up(amount))
}

#[derive(Debug, Error)]
pub enum ScheduleExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes computed schedules as CSV.
///
/// Year rows carry one column per active category in display order, then
/// the year total. All amounts are rounded half-up to cents.
pub struct ScheduleExporter;

impl ScheduleExporter {
    fn columns(schedule: &DepreciationSchedule) -> Vec<AssetCategory> {
        schedule.categories.iter().map(|c| c.category).collect()
    }

    /// Year-by-year table: `year,<category>...,total`.
    pub fn write_schedule<W: Write>(
        schedule: &DepreciationSchedule,
        writer: W,
    ) -> Result<(), ScheduleExportError> {
        let columns = Self::columns(schedule);
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["year".to_string()];
        header.extend(columns.iter().map(|c| c.as_str().to_string()));
        header.push("total".to_string());
        csv_writer.write_record(&header)?;

        for row in &schedule.rows {
            let mut record = vec![row.year.to_string()];
            record.extend(
                columns
                    .iter()
                    .map(|c| cents(row.amount(*c))),
            );
            record.push(cents(row.total));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// One row per category with its basis breakdown.
    pub fn write_category_summary<W: Write>(
        schedule: &DepreciationSchedule,
        writer: W,
    ) -> Result<(), ScheduleExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "category",
            "allocation_percent",
            "initial_basis",
            "section_179",
            "bonus",
            "remaining_basis",
            "first_year",
            "total_depreciation",
        ])?;

        for basis in &schedule.categories {
            csv_writer.write_record([
                basis.category.as_str().to_string(),
                basis.allocation_percent.normalize().to_string(),
                cents(basis.initial_basis),
                cents(basis.section_179_amount),
                cents(basis.bonus_amount),
                cents(basis.remaining_basis),
                cents(basis.first_year_total()),
                cents(basis.cumulative_depreciation),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_schedule_file(
        schedule: &DepreciationSchedule,
        path: &Path,
    ) -> Result<(), ScheduleExportError> {
        let file = File::create(path)?;
        Self::write_schedule(schedule, file)
    }

    pub fn write_category_summary_file(
        schedule: &DepreciationSchedule,
        path: &Path,
    ) -> Result<(), ScheduleExportError> {
        let file = File::create(path)?;
        Self::write_category_summary(schedule, file)
    }
}
