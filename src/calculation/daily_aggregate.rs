//! Daily aggregation of sales and attendance.
//!
//! For one calendar day this module sums every sales record into revenue and
//! collapses attendance rows into the distinct set of present workers.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::WorkerId;
use crate::store::RecordStore;

/// Revenue and attendance for one calendar day, before distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAggregate {
    /// The calendar day.
    pub date: NaiveDate,
    /// Sum of every sales record's unit count.
    pub units_sold: u64,
    /// `units_sold` multiplied by the unit price.
    pub revenue: Decimal,
    /// Distinct workers with at least one attendance record.
    pub present: BTreeSet<WorkerId>,
}

/// Converts a unit count into revenue.
///
/// Fails with [`EngineError::CalculationError`] if the product does not fit
/// in a decimal.
///
/// # Example
///
/// ```
/// use sales_payroll::calculation::revenue_for;
/// use rust_decimal::Decimal;
///
/// assert_eq!(revenue_for(10, Decimal::from(300)).unwrap(), Decimal::from(3000));
/// ```
pub fn revenue_for(units_sold: u64, unit_price: Decimal) -> EngineResult<Decimal> {
    Decimal::from(units_sold)
        .checked_mul(unit_price)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "revenue overflow: {} units at unit price {}",
                units_sold, unit_price
            ),
        })
}

/// Aggregates one day's sales and attendance.
///
/// Duplicate attendance rows for the same worker count once. A day with no
/// attendance still reports its revenue; deciding what that means is left to
/// the distributor.
///
/// # Errors
///
/// Store failures are returned as [`EngineError::StoreUnavailable`] with the
/// date and collection in the context.
pub fn aggregate_day<S: RecordStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    unit_price: Decimal,
) -> EngineResult<DailyAggregate> {
    let counts = store
        .sales_for_date(date)
        .map_err(|e| e.at_date("sales", date))?;
    let attendance = store
        .attendance_for_date(date)
        .map_err(|e| e.at_date("attendance", date))?;

    let units_sold: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    let revenue = revenue_for(units_sold, unit_price)?;

    let rows = attendance.len();
    let present: BTreeSet<WorkerId> = attendance.into_iter().collect();

    debug!(
        %date,
        sales_records = counts.len(),
        units_sold,
        revenue = %revenue,
        attendance_rows = rows,
        present = present.len(),
        "Aggregated day"
    );

    Ok(DailyAggregate {
        date,
        units_sold,
        revenue,
        present,
    })
}
