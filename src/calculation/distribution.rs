//! Even-split payroll distribution.
//!
//! A day's revenue is divided equally among the workers present that day.
//! Range payroll then adds each day's shares into an [`IncomeLedger`].
//! Shares are never rounded here; rounding happens only when a report is
//! rendered.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DailyOutcome, DayStatus, WorkerId};

use super::DailyAggregate;

/// Splits a day's revenue evenly among the workers present.
///
/// With `N > 0` present workers each receives `revenue / N`. With nobody
/// present the outcome is [`DayStatus::NoActivity`] and carries no shares.
///
/// # Example
///
/// ```
/// use sales_payroll::calculation::{split_evenly, DailyAggregate};
/// use sales_payroll::models::WorkerId;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeSet;
///
/// let aggregate = DailyAggregate {
///     date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     units_sold: 10,
///     revenue: Decimal::from(3000),
///     present: BTreeSet::from([WorkerId(1), WorkerId(2)]),
/// };
///
/// let outcome = split_evenly(aggregate);
/// assert_eq!(outcome.share_for(WorkerId(1)), Some(Decimal::from(1500)));
/// assert_eq!(outcome.share_for(WorkerId(2)), Some(Decimal::from(1500)));
/// ```
pub fn split_evenly(aggregate: DailyAggregate) -> DailyOutcome {
    let DailyAggregate {
        date,
        units_sold,
        revenue,
        present,
    } = aggregate;

    if present.is_empty() {
        return DailyOutcome::no_activity(date, units_sold, revenue);
    }

    let share = revenue / Decimal::from(present.len() as u64);
    let shares = present.iter().map(|&id| (id, share)).collect();

    DailyOutcome {
        date,
        units_sold,
        revenue,
        present,
        shares,
        status: DayStatus::Active,
    }
}

/// Running per-worker totals across a range.
///
/// Totals only ever grow by each day's share; nothing is overwritten.
/// Workers appear once they have attended at least one day, even when every
/// day they attended had zero revenue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeLedger {
    totals: BTreeMap<WorkerId, Decimal>,
    days_recorded: usize,
}

impl IncomeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every share of a day's outcome to the running totals.
    ///
    /// Fails with [`EngineError::CalculationError`] naming the worker and
    /// day if a total would overflow; the ledger is left unchanged.
    pub fn record(&mut self, outcome: &DailyOutcome) -> EngineResult<()> {
        let mut updated = Vec::with_capacity(outcome.shares.len());
        for (&worker_id, &share) in &outcome.shares {
            let current = self.total_for(worker_id).unwrap_or(Decimal::ZERO);
            let total = current
                .checked_add(share)
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!(
                        "income overflow for worker {} on {}",
                        worker_id, outcome.date
                    ),
                })?;
            updated.push((worker_id, total));
        }

        self.totals.extend(updated);
        self.days_recorded += 1;
        Ok(())
    }

    /// Current total for a worker, if they have attended.
    pub fn total_for(&self, worker_id: WorkerId) -> Option<Decimal> {
        self.totals.get(&worker_id).copied()
    }

    /// Number of days folded into the ledger.
    pub fn days_recorded(&self) -> usize {
        self.days_recorded
    }

    /// Number of workers with a total.
    pub fn worker_count(&self) -> usize {
        self.totals.len()
    }

    /// Consumes the ledger and returns the totals.
    pub fn into_totals(self) -> BTreeMap<WorkerId, Decimal> {
        self.totals
    }
}
