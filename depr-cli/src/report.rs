//! Rendering of a computed schedule for the terminal, CSV or JSON.

use std::fmt::Write as _;
use std::io::Write;

use clap::ValueEnum;
use depr_core::{
    AllocationMap, AssetCategory, DepreciationSchedule, PropertyInputs, ScheduleSummary,
};
use depr_data::{ScheduleExportError, ScheduleExporter};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::utils::{format_currency, format_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Export(#[from] ScheduleExportError),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Warning text for an allocation that does not sum to 100%, if any.
pub fn allocation_advisory(allocations: &AllocationMap) -> Option<String> {
    if allocations.is_balanced() {
        return None;
    }
    let total = allocations.total_percent();
    let unallocated = allocations.unallocated_percent();
    let detail = if unallocated > Decimal::ZERO {
        format!("{} of the cost is unallocated", format_percent(unallocated))
    } else {
        format!("over-allocated by {}", format_percent(-unallocated))
    };
    Some(format!(
        "allocation percentages total {}, not 100%; {detail}",
        format_percent(total)
    ))
}

fn short_label(category: AssetCategory) -> &'static str {
    match category {
        AssetCategory::Land => "Land",
        AssetCategory::FiveYear => "5-Yr",
        AssetCategory::SevenYear => "7-Yr",
        AssetCategory::FifteenYear => "15-Yr",
        AssetCategory::Residential => "27.5-Yr",
        AssetCategory::Commercial => "39-Yr",
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    inputs: &'a PropertyInputs,
    advisory: Option<String>,
    summary: &'a ScheduleSummary,
    schedule: &'a DepreciationSchedule,
}

/// A schedule together with the inputs that produced it.
pub struct ScheduleReport<'a> {
    inputs: &'a PropertyInputs,
    schedule: &'a DepreciationSchedule,
    summary: ScheduleSummary,
}

impl<'a> ScheduleReport<'a> {
    pub fn new(
        inputs: &'a PropertyInputs,
        schedule: &'a DepreciationSchedule,
    ) -> Self {
        Self {
            inputs,
            schedule,
            summary: ScheduleSummary::from_schedule(schedule),
        }
    }

    pub fn summary(&self) -> &ScheduleSummary {
        &self.summary
    }

    pub fn write<W: Write>(
        &self,
        format: OutputFormat,
        mut writer: W,
    ) -> Result<(), ReportError> {
        match format {
            OutputFormat::Text => writer.write_all(self.render_text()?.as_bytes())?,
            OutputFormat::Csv => ScheduleExporter::write_schedule(self.schedule, writer)?,
            OutputFormat::Json => {
                let report = JsonReport {
                    inputs: self.inputs,
                    advisory: allocation_advisory(&self.inputs.allocations),
                    summary: &self.summary,
                    schedule: self.schedule,
                };
                serde_json::to_writer_pretty(&mut writer, &report)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Plain-text report. Year rows stop after the last year with a
    /// deduction.
    pub fn render_text(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        self.write_inputs(&mut out)?;
        self.write_categories(&mut out)?;
        self.write_summary(&mut out)?;
        self.write_years(&mut out)?;
        Ok(out)
    }

    fn write_inputs(
        &self,
        out: &mut String,
    ) -> std::fmt::Result {
        let inputs = self.inputs;
        writeln!(out, "Depreciation Schedule")?;
        writeln!(out, "=====================")?;
        writeln!(out, "{:<22}{}", "Total cost:", format_currency(inputs.total_cost))?;
        writeln!(out, "{:<22}{}", "Placed in service:", inputs.placed_in_service)?;
        writeln!(out, "{:<22}{}", "Property type:", inputs.property_type.label())?;
        writeln!(out, "{:<22}{}", "Method:", inputs.method.label())?;

        let section_179 = if inputs.use_section_179 {
            format!("elected, {} requested", format_currency(inputs.section_179_amount))
        } else {
            "not elected".to_string()
        };
        writeln!(out, "{:<22}{}", "Section 179:", section_179)?;

        let bonus = if inputs.use_bonus_depreciation {
            format!(
                "elected, {} rate for {}",
                format_percent(self.schedule.bonus_rate * Decimal::ONE_HUNDRED),
                self.schedule.placed_in_service_year
            )
        } else {
            "not elected".to_string()
        };
        writeln!(out, "{:<22}{}", "Bonus depreciation:", bonus)?;

        if let Some(advisory) = allocation_advisory(&inputs.allocations) {
            writeln!(out)?;
            writeln!(out, "WARNING: {advisory}")?;
        }
        writeln!(out)
    }

    fn write_categories(
        &self,
        out: &mut String,
    ) -> std::fmt::Result {
        writeln!(out, "Category Basis")?;
        writeln!(
            out,
            "{:<30}{:>8}{:>17}{:>17}{:>17}{:>17}{:>17}",
            "Category", "Alloc", "Basis", "Section 179", "Bonus", "Remaining", "First Year"
        )?;
        for basis in &self.schedule.categories {
            writeln!(
                out,
                "{:<30}{:>8}{:>17}{:>17}{:>17}{:>17}{:>17}",
                basis.category.label(),
                format_percent(basis.allocation_percent),
                format_currency(basis.initial_basis),
                format_currency(basis.section_179_amount),
                format_currency(basis.bonus_amount),
                format_currency(basis.remaining_basis),
                format_currency(basis.first_year_total()),
            )?;
        }
        writeln!(out)
    }

    fn write_summary(
        &self,
        out: &mut String,
    ) -> std::fmt::Result {
        let summary = &self.summary;
        writeln!(out, "Summary")?;
        for (label, amount) in [
            ("First-year deduction:", summary.first_year_total),
            ("5-year total:", summary.five_year_total),
            ("10-year total:", summary.ten_year_total),
            ("Total depreciation:", summary.total_depreciation),
            ("Depreciable basis:", summary.total_depreciable_basis),
            ("Section 179 taken:", summary.section_179_total),
            ("Bonus taken:", summary.bonus_total),
        ] {
            writeln!(out, "{label:<22}{:>17}", format_currency(amount))?;
        }
        writeln!(out)
    }

    fn write_years(
        &self,
        out: &mut String,
    ) -> std::fmt::Result {
        let Some(last_year) = self.schedule.last_deduction_year() else {
            return writeln!(out, "No deductions in the schedule horizon.");
        };
        let columns: Vec<_> = self.schedule.categories.iter().map(|c| c.category).collect();

        writeln!(out, "Year-by-Year")?;
        write!(out, "{:<6}", "Year")?;
        for category in &columns {
            write!(out, "{:>15}", short_label(*category))?;
        }
        writeln!(out, "{:>17}", "Total")?;

        for row in self.schedule.rows.iter().take_while(|row| row.year <= last_year) {
            write!(out, "{:<6}", row.year)?;
            for category in &columns {
                write!(out, "{:>15}", format_currency(row.amount(*category)))?;
            }
            writeln!(out, "{:>17}", format_currency(row.total))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use depr_core::{DepreciationMethod, PropertyType, ScheduleEngine, compute_schedule};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::default_allocations;

    fn test_inputs() -> PropertyInputs {
        PropertyInputs {
            total_cost: dec!(1000000),
            placed_in_service: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            property_type: PropertyType::Commercial,
            allocations: default_allocations(),
            method: DepreciationMethod::Macrs,
            use_section_179: false,
            section_179_amount: Decimal::ZERO,
            use_bonus_depreciation: true,
        }
    }

    fn render(
        inputs: &PropertyInputs,
        format: OutputFormat,
    ) -> String {
        let schedule = compute_schedule(inputs);
        let mut buf = Vec::new();
        ScheduleReport::new(inputs, &schedule)
            .write(format, &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    // =========================================================================
    // allocation_advisory
    // =========================================================================

    #[test]
    fn advisory_is_none_for_balanced_split() {
        assert_eq!(allocation_advisory(&default_allocations()), None);
    }

    #[test]
    fn advisory_reports_unallocated_share() {
        let allocations = default_allocations().with(AssetCategory::Commercial, dec!(50));

        assert_eq!(
            allocation_advisory(&allocations).as_deref(),
            Some("allocation percentages total 90%, not 100%; 10% of the cost is unallocated")
        );
    }

    #[test]
    fn advisory_reports_over_allocation() {
        let allocations = default_allocations().with(AssetCategory::Land, dec!(20.5));

        assert_eq!(
            allocation_advisory(&allocations).as_deref(),
            Some("allocation percentages total 105.5%, not 100%; over-allocated by 5.5%")
        );
    }

    // =========================================================================
    // text
    // =========================================================================

    #[test]
    fn text_report_shows_inputs_and_summary() {
        let text = render(&test_inputs(), OutputFormat::Text);

        assert!(text.contains("Total cost:           $1,000,000.00"));
        assert!(text.contains("Bonus depreciation:   elected, 60% rate for 2024"));
        assert!(text.contains("First-year deduction:       $176,424.00"));
        assert!(!text.contains("WARNING"));
    }

    #[test]
    fn text_report_lists_active_categories_only() {
        let text = render(&test_inputs(), OutputFormat::Text);

        assert!(text.contains("39-Year Nonresidential Real"));
        assert!(!text.contains("27.5-Year Residential Rental"));
    }

    #[test]
    fn text_report_trims_trailing_zero_years() {
        let inputs = PropertyInputs {
            allocations: AllocationMap::new()
                .with(AssetCategory::Land, dec!(50))
                .with(AssetCategory::FiveYear, dec!(50)),
            use_bonus_depreciation: false,
            ..test_inputs()
        };

        let text = render(&inputs, OutputFormat::Text);

        assert!(text.contains("\n2029  "));
        assert!(!text.contains("\n2030  "));
    }

    #[test]
    fn text_report_without_deductions() {
        let inputs = PropertyInputs {
            total_cost: Decimal::ZERO,
            ..test_inputs()
        };

        let text = render(&inputs, OutputFormat::Text);

        assert!(text.ends_with("No deductions in the schedule horizon.\n"));
    }

    #[test]
    fn render_text_matches_written_text_report() {
        let inputs = test_inputs();
        let schedule = compute_schedule(&inputs);

        let text = ScheduleReport::new(&inputs, &schedule).render_text();

        assert!(text.is_ok());
        assert_eq!(text.unwrap(), render(&inputs, OutputFormat::Text));
    }

    #[test]
    fn format_error_converts_to_report_error() {
        let err = ReportError::from(std::fmt::Error);

        assert!(matches!(err, ReportError::Format(_)));
        assert_eq!(err.to_string(), "formatting failed: an error occurred when formatting an argument");
    }

    #[test]
    fn text_report_warns_on_unbalanced_allocation() {
        let inputs = PropertyInputs {
            allocations: default_allocations().with(AssetCategory::Commercial, dec!(50)),
            ..test_inputs()
        };

        let text = render(&inputs, OutputFormat::Text);

        assert!(text.contains("WARNING: allocation percentages total 90%"));
    }

    // =========================================================================
    // csv / json
    // =========================================================================

    #[test]
    fn csv_report_matches_exporter() {
        let csv = render(&test_inputs(), OutputFormat::Csv);
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("year,land,five_year,seven_year,fifteen_year,commercial,total")
        );
        assert_eq!(
            lines.next(),
            Some("2024,0.00,54400.00,32858.00,74400.00,14766.00,176424.00")
        );
    }

    #[test]
    fn json_report_carries_summary_and_rows() {
        let inputs = test_inputs();
        let schedule = ScheduleEngine::with_horizon(3).calculate(&inputs);
        let mut buf = Vec::new();
        ScheduleReport::new(&inputs, &schedule)
            .write(OutputFormat::Json, &mut buf)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        let first_year = value["summary"]["first_year_total"]
            .as_str()
            .and_then(|s| s.parse::<Decimal>().ok());

        assert_eq!(first_year, Some(dec!(176424)));
        assert_eq!(value["schedule"]["rows"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["inputs"]["method"], "macrs");
        assert!(value["advisory"].is_null());
    }
}
