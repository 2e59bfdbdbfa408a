pub mod calculations;
pub mod models;

pub use calculations::{
    CategoryBasis, DepreciationSchedule, ScheduleEngine, ScheduleSummary, ScheduleYear,
    compute_schedule,
};
pub use models::*;
