//! Core data models for the payroll engine.
//!
//! This module contains the raw records held by the record store and the
//! transient results produced by payroll runs.

mod daily_outcome;
mod payroll_report;
mod records;
mod worker;

pub use daily_outcome::{DailyOutcome, DayStatus};
pub use payroll_report::PayrollReport;
pub use records::{AttendanceRecord, SalesRecord};
pub use worker::{Worker, WorkerId};
