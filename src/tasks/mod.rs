//! Background Tasks Module
//!
//! # Tasks
//! - Stats reporter: logs cache statistics at a configured interval

mod report;

pub use report::spawn_stats_reporter;
