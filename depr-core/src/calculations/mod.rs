//! Depreciation calculations.
//!
//! [`tables`] holds the static MACRS and bonus rates, [`schedule`] runs the
//! basis pipeline, and [`summary`] reduces a finished schedule to the
//! headline figures.

pub mod common;
pub mod schedule;
pub mod summary;
pub mod tables;

pub use schedule::{
    CategoryBasis, DepreciationSchedule, SCHEDULE_HORIZON_YEARS, ScheduleEngine, ScheduleYear,
    compute_schedule,
};
pub use summary::ScheduleSummary;
pub use tables::{MacrsTable, bonus_rate, macrs_rate};
