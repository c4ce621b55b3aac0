//! Calculation logic for the payroll engine.
//!
//! This module contains date range resolution, per-day aggregation of sales
//! and attendance, and the even-split distribution rule with its running
//! income ledger.

mod daily_aggregate;
mod date_range;
mod distribution;

pub use daily_aggregate::{DailyAggregate, aggregate_day, revenue_for};
pub use date_range::{
    DATE_FORMAT, DateRange, MONTH_DAYS, PayrollPeriod, WEEK_DAYS, parse_date,
};
pub use distribution::{IncomeLedger, split_evenly};
