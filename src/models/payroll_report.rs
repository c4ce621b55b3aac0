//! Range payroll report model.
//!
//! This module contains the [`PayrollReport`] produced by range-mode payroll.
//! A report is informational: building one never changes a worker's stored
//! pay figure.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{DailyOutcome, Worker, WorkerId};

/// Per-day outcomes and accumulated income over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// One outcome per day, in calendar order.
    pub days: Vec<DailyOutcome>,
    /// Accumulated income per worker. Workers who never attended are absent.
    pub income: BTreeMap<WorkerId, Decimal>,
    /// Every worker referenced by the report, used for names.
    pub roster: BTreeMap<WorkerId, Worker>,
}

impl PayrollReport {
    /// Returns a worker's accumulated income, if they attended at all.
    pub fn income_for(&self, worker_id: WorkerId) -> Option<Decimal> {
        self.income.get(&worker_id).copied()
    }

    /// Total revenue over the range, including undistributed days.
    pub fn total_revenue(&self) -> EngineResult<Decimal> {
        checked_total(self.days.iter().map(|d| d.revenue), "total revenue")
    }

    /// Total handed out to workers over the range.
    pub fn total_income(&self) -> EngineResult<Decimal> {
        checked_total(self.income.values().copied(), "total income")
    }

    /// Number of days on which nobody attended.
    pub fn no_activity_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_no_activity()).count()
    }

    /// Looks up the outcome for a specific day.
    pub fn day(&self, date: NaiveDate) -> Option<&DailyOutcome> {
        self.days.iter().find(|d| d.date == date)
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Decimal>, what: &str) -> EngineResult<Decimal> {
    amounts.try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("{} overflow", what),
            })
    })
}
