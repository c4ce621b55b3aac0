//! Raw attendance and sales facts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WorkerId;

/// Records that a worker was present on a date.
///
/// The store may hold several identical rows for the same worker and date;
/// aggregation counts the worker once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The worker who attended.
    pub worker_id: WorkerId,
    /// The calendar date of attendance.
    pub date: NaiveDate,
}

/// Records a number of product units sold on a date.
///
/// Several records on the same date are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Units sold.
    pub units_sold: u32,
    /// The calendar date of the sale.
    pub date: NaiveDate,
}
