//! Per-day payroll outcome.
//!
//! A [`DailyOutcome`] is the transient result of aggregating and
//! distributing one calendar day: how much revenue the day produced, who was
//! present, and what each present worker's share was.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::WorkerId;

/// Whether a day had anyone to pay.
///
/// `NoActivity` is informational. It is never an error and never aborts a
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// At least one worker was present and received a share.
    Active,
    /// Nobody attended, so the day's revenue was not distributed.
    NoActivity,
}

/// The revenue and distribution for one calendar day.
///
/// # Example
///
/// ```
/// use sales_payroll::models::{DailyOutcome, DayStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let outcome = DailyOutcome::no_activity(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     10,
///     Decimal::from(3000),
/// );
/// assert_eq!(outcome.status, DayStatus::NoActivity);
/// assert!(outcome.shares.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOutcome {
    /// The calendar day.
    pub date: NaiveDate,
    /// Sum of every sales record's unit count for the day.
    pub units_sold: u64,
    /// Units sold multiplied by the unit price.
    pub revenue: Decimal,
    /// Distinct workers present, ordered by id.
    pub present: BTreeSet<WorkerId>,
    /// Each present worker's share of the revenue.
    pub shares: BTreeMap<WorkerId, Decimal>,
    /// Whether the revenue was distributed.
    pub status: DayStatus,
}

impl DailyOutcome {
    /// Builds the outcome for a day with no attendance.
    pub fn no_activity(date: NaiveDate, units_sold: u64, revenue: Decimal) -> Self {
        Self {
            date,
            units_sold,
            revenue,
            present: BTreeSet::new(),
            shares: BTreeMap::new(),
            status: DayStatus::NoActivity,
        }
    }

    /// Returns the share a worker received on this day, if present.
    pub fn share_for(&self, worker_id: WorkerId) -> Option<Decimal> {
        self.shares.get(&worker_id).copied()
    }

    /// Sum of all shares handed out on this day.
    pub fn distributed(&self) -> Decimal {
        self.shares.values().copied().sum()
    }

    /// Returns true if nobody attended.
    pub fn is_no_activity(&self) -> bool {
        self.status == DayStatus::NoActivity
    }
}
