//! CSV input and output for depreciation schedules.
//!
//! [`ScenarioLoader`] reads property scenarios, one per row, and
//! [`ScheduleExporter`] writes computed schedules back out.

mod export;
mod loader;

pub use export::{ScheduleExportError, ScheduleExporter};
pub use loader::{Scenario, ScenarioLoadError, ScenarioLoader, ScenarioRecord};
