//! Request types for the payroll API.
//!
//! Dates travel as `YYYY-MM-DD` text and are validated by the engine, so a
//! malformed date comes back as an `INVALID_DATE` error instead of a generic
//! JSON rejection.

use serde::{Deserialize, Serialize};

use crate::calculation::PayrollPeriod;

/// Request body for `POST /payroll/daily`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPayRequest {
    /// The day to pay out, `YYYY-MM-DD`. Defaults to today.
    #[serde(default)]
    pub date: Option<String>,
}

/// Request body for `POST /payroll/range`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRequest {
    /// First day of the range, inclusive.
    pub start_date: String,
    /// Last day of the range, inclusive.
    pub end_date: String,
    /// Also write the report to the configured report directory.
    #[serde(default)]
    pub export: bool,
}

/// Request body for `POST /payroll/period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// `week` or `month`.
    pub period: PayrollPeriod,
    /// Last day of the period. Defaults to today.
    #[serde(default)]
    pub end_date: Option<String>,
}
