//! Static rate tables consumed by the schedule engine.
//!
//! Both tables are plain constants and safe to share between threads.

pub mod bonus;
pub mod macrs;

pub use bonus::{BONUS_RATES, bonus_rate};
pub use macrs::{MACRS_TABLES, MacrsTable, macrs_rate};
