//! The payroll engine.
//!
//! [`PayrollEngine`] owns the injected [`RecordStore`] and the unit price and
//! exposes the two payroll operations:
//!
//! - [`PayrollEngine::assign_daily_pay`] computes one day's shares and
//!   overwrites each present worker's pay figure with them.
//! - [`PayrollEngine::report_range_income`] accumulates shares over a range
//!   into a [`PayrollReport`] without touching any worker record.
//!
//! Each operation runs inside one store [`Transaction`]. Date text is
//! validated before the transaction is opened, so input errors never reach
//! the store.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{DateRange, IncomeLedger, PayrollPeriod, aggregate_day, split_evenly};
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::export::{ExportedReport, ReportExporter};
use crate::models::{DailyOutcome, PayrollReport};
use crate::store::{RecordStore, Transaction};

/// Splits daily sales revenue among attending workers.
///
/// The engine is synchronous and holds no locks. Callers running payroll
/// from several threads must serialize access themselves.
///
/// # Example
///
/// ```
/// use sales_payroll::engine::PayrollEngine;
/// use sales_payroll::models::{Worker, WorkerId};
/// use sales_payroll::store::{InMemoryStore, RecordStore};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut store = InMemoryStore::new();
/// store.add_worker(Worker::new(1, "ali", "valiyev"));
/// store.add_worker(Worker::new(2, "bobur", "karimov"));
/// store.record_sales(4, day);
/// store.record_sales(6, day);
/// store.record_attendance(WorkerId(1), day);
/// store.record_attendance(WorkerId(2), day);
///
/// let mut engine = PayrollEngine::new(store, Decimal::from(300));
/// let outcome = engine.assign_daily_pay("2024-01-01").unwrap();
///
/// assert_eq!(outcome.revenue, Decimal::from(3000));
/// assert_eq!(engine.store().worker(WorkerId(1)).unwrap().pay, Decimal::from(1500));
/// ```
#[derive(Debug)]
pub struct PayrollEngine<S> {
    store: S,
    unit_price: Decimal,
}

impl<S: RecordStore> PayrollEngine<S> {
    /// Creates an engine over a store with a fixed unit price.
    pub fn new(store: S, unit_price: Decimal) -> Self {
        Self { store, unit_price }
    }

    /// Creates an engine using the configured unit price.
    pub fn from_config(store: S, config: &PayrollConfig) -> Self {
        Self::new(store, config.unit_price)
    }

    /// The currency amount earned per unit sold.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the engine and returns the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Single-day payroll for a `YYYY-MM-DD` date.
    ///
    /// See [`Self::assign_daily_pay_on`].
    pub fn assign_daily_pay(&mut self, date: &str) -> EngineResult<DailyOutcome> {
        let range = DateRange::parse_single(date)?;
        self.assign_daily_pay_on(range.start())
    }

    /// Single-day payroll.
    ///
    /// Overwrites the pay figure of every worker present on `date` with that
    /// day's share. The previous figure is replaced, not added to. A day with
    /// nobody present changes nothing and returns a
    /// [`crate::models::DayStatus::NoActivity`] outcome.
    ///
    /// All updates commit together. If any update fails, none are kept.
    pub fn assign_daily_pay_on(&mut self, date: NaiveDate) -> EngineResult<DailyOutcome> {
        let unit_price = self.unit_price;
        let mut tx = Transaction::begin(&mut self.store)?;

        let outcome = split_evenly(aggregate_day(&*tx, date, unit_price)?);

        if outcome.is_no_activity() {
            info!(%date, revenue = %outcome.revenue, "No workers present, pay unchanged");
            tx.commit()?;
            return Ok(outcome);
        }

        for (&worker_id, &share) in &outcome.shares {
            let updated = match tx.worker(worker_id) {
                Ok(_) => tx.update_worker_pay(worker_id, share),
                Err(e) => Err(e.at_date("attendance", date)),
            };
            if let Err(e) = updated {
                warn!(%date, %worker_id, error = %e, "Daily pay assignment rolled back");
                return Err(e);
            }
        }
        tx.commit()?;

        info!(
            %date,
            revenue = %outcome.revenue,
            workers = outcome.present.len(),
            "Assigned daily pay"
        );

        Ok(outcome)
    }

    /// Range payroll for a pair of `YYYY-MM-DD` dates.
    ///
    /// See [`Self::report_income`].
    pub fn report_range_income(&mut self, start: &str, end: &str) -> EngineResult<PayrollReport> {
        let range = DateRange::parse(start, end)?;
        self.report_income(range)
    }

    /// Range payroll for a trailing week or month ending on `end`.
    pub fn report_period_income(
        &mut self,
        period: PayrollPeriod,
        end: NaiveDate,
    ) -> EngineResult<PayrollReport> {
        self.report_income(period.ending_on(end))
    }

    /// Range payroll.
    ///
    /// Walks every day of the range, splits each day's revenue among the
    /// workers present that day, and adds the shares to per-worker totals.
    /// Days with nobody present are kept in the report but add nothing.
    /// Worker records are read, never written.
    ///
    /// A store failure, an unknown worker or an income total past the
    /// decimal range aborts the whole range; no partial report is returned.
    pub fn report_income(&mut self, range: DateRange) -> EngineResult<PayrollReport> {
        let unit_price = self.unit_price;
        let tx = Transaction::begin(&mut self.store)?;

        let result = build_report(&*tx, range, unit_price);
        match &result {
            Ok(report) => {
                info!(
                    %range,
                    days = report.days.len(),
                    idle_days = report.no_activity_days(),
                    workers = report.income.len(),
                    revenue = ?report.total_revenue().ok(),
                    "Built range payroll report"
                );
                tx.commit()?;
            }
            Err(e) => {
                warn!(%range, error = %e, "Range payroll aborted");
            }
        }
        result
    }

    /// Builds a range report and exports it atomically.
    pub fn export_range_report(
        &mut self,
        start: &str,
        end: &str,
        exporter: &ReportExporter,
    ) -> EngineResult<ExportedReport> {
        let report = self.report_range_income(start, end)?;
        exporter.export(&report)
    }
}

fn build_report<S: RecordStore + ?Sized>(
    store: &S,
    range: DateRange,
    unit_price: Decimal,
) -> EngineResult<PayrollReport> {
    let mut ledger = IncomeLedger::new();
    let mut days = Vec::with_capacity(usize::try_from(range.day_count()).unwrap_or(0));
    let mut roster = BTreeMap::new();

    for date in range.days() {
        let outcome = split_evenly(aggregate_day(store, date, unit_price)?);

        if outcome.is_no_activity() {
            debug!(%date, revenue = %outcome.revenue, "No activity");
        }

        for &worker_id in &outcome.present {
            if !roster.contains_key(&worker_id) {
                let worker = store
                    .worker(worker_id)
                    .map_err(|e| e.at_date("attendance", date))?;
                roster.insert(worker_id, worker);
            }
        }

        ledger.record(&outcome)?;
        days.push(outcome);
    }

    Ok(PayrollReport {
        start_date: range.start(),
        end_date: range.end(),
        days,
        income: ledger.into_totals(),
        roster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{DayStatus, Worker, WorkerId};
    use crate::store::InMemoryStore;
    use std::cell::Cell;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    /// Two-day scenario: 2024-01-01 sells 4 + 6 units with workers 1 and 2
    /// (worker 1 checked in twice); 2024-01-02 sells nothing with worker 1.
    fn example_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_worker(Worker::new(1, "ali", "valiyev"));
        store.add_worker(Worker::new(2, "bobur", "karimov"));
        store.add_worker(Worker::new(3, "dilnoza", "rahimova"));
        store.record_sales(4, d(1));
        store.record_sales(6, d(1));
        store.record_attendance(WorkerId(1), d(1));
        store.record_attendance(WorkerId(1), d(1));
        store.record_attendance(WorkerId(2), d(1));
        store.record_attendance(WorkerId(1), d(2));
        store
    }

    fn engine() -> PayrollEngine<InMemoryStore> {
        PayrollEngine::new(example_store(), Decimal::from(300))
    }

    fn pay(engine: &PayrollEngine<InMemoryStore>, id: u32) -> Decimal {
        engine.store().worker(WorkerId(id)).unwrap().pay
    }

    /// Store wrapper that fails sales reads on one date.
    struct FlakyStore {
        inner: InMemoryStore,
        fail_on: NaiveDate,
        reads: Cell<usize>,
    }

    impl RecordStore for FlakyStore {
        fn sales_for_date(&self, date: NaiveDate) -> EngineResult<Vec<u32>> {
            self.reads.set(self.reads.get() + 1);
            if date == self.fail_on {
                return Err(EngineError::store("", "disk I/O error"));
            }
            self.inner.sales_for_date(date)
        }
        fn attendance_for_date(&self, date: NaiveDate) -> EngineResult<Vec<WorkerId>> {
            self.inner.attendance_for_date(date)
        }
        fn worker(&self, id: WorkerId) -> EngineResult<Worker> {
            self.inner.worker(id)
        }
        fn update_worker_pay(&mut self, id: WorkerId, amount: Decimal) -> EngineResult<()> {
            self.inner.update_worker_pay(id, amount)
        }
        fn begin(&mut self) -> EngineResult<()> {
            self.inner.begin()
        }
        fn commit(&mut self) -> EngineResult<()> {
            self.inner.commit()
        }
        fn rollback(&mut self) {
            self.inner.rollback()
        }
    }

    fn flaky_engine(fail_on: NaiveDate) -> PayrollEngine<FlakyStore> {
        let store = FlakyStore {
            inner: example_store(),
            fail_on,
            reads: Cell::new(0),
        };
        PayrollEngine::new(store, Decimal::from(300))
    }

    /// PE-001: single-day mode overwrites pay of present workers
    #[test]
    fn test_assign_daily_pay_sets_shares() {
        let mut engine = engine();

        let outcome = engine.assign_daily_pay("2024-01-01").unwrap();

        assert_eq!(outcome.revenue, Decimal::from(3000));
        assert_eq!(outcome.status, DayStatus::Active);
        assert_eq!(pay(&engine, 1), Decimal::from(1500));
        assert_eq!(pay(&engine, 2), Decimal::from(1500));
        assert_eq!(pay(&engine, 3), Decimal::ZERO);
        assert!(!engine.store().in_transaction());
    }

    /// PE-002: a later single-day run overwrites rather than adds
    #[test]
    fn test_assign_daily_pay_overwrites_previous_figure() {
        let mut engine = engine();

        engine.assign_daily_pay("2024-01-01").unwrap();
        engine.assign_daily_pay("2024-01-02").unwrap();

        assert_eq!(pay(&engine, 1), Decimal::ZERO);
        // Worker 2 was absent on the second day and keeps the first figure.
        assert_eq!(pay(&engine, 2), Decimal::from(1500));
    }

    /// PE-003: a no-activity day changes nothing
    #[test]
    fn test_assign_daily_pay_no_activity_leaves_pay() {
        let mut engine = engine();
        engine.assign_daily_pay("2024-01-01").unwrap();
        engine.store_mut().record_sales(10, d(5));

        let outcome = engine.assign_daily_pay("2024-01-05").unwrap();

        assert_eq!(outcome.status, DayStatus::NoActivity);
        assert_eq!(outcome.revenue, Decimal::from(3000));
        assert_eq!(pay(&engine, 1), Decimal::from(1500));
    }

    /// PE-004: invalid date text aborts before the store is touched
    #[test]
    fn test_assign_daily_pay_rejects_bad_date() {
        let mut engine = flaky_engine(d(9));

        let result = engine.assign_daily_pay("01.01.2024");

        assert!(matches!(result, Err(EngineError::InvalidDateFormat { .. })));
        assert_eq!(engine.store().reads.get(), 0);
    }

    /// PE-005: an unknown worker rolls back every update of the day
    #[test]
    fn test_assign_daily_pay_rolls_back_on_unknown_worker() {
        let mut engine = engine();
        engine.assign_daily_pay("2024-01-01").unwrap();
        engine.store_mut().record_sales(2, d(3));
        engine.store_mut().record_attendance(WorkerId(1), d(3));
        engine.store_mut().record_attendance(WorkerId(99), d(3));

        let result = engine.assign_daily_pay("2024-01-03");

        match result {
            Err(EngineError::WorkerNotFound { id, context }) => {
                assert_eq!(id, WorkerId(99));
                assert_eq!(context, "attendance for 2024-01-03");
            }
            other => panic!("Expected WorkerNotFound, got {:?}", other),
        }
        assert_eq!(pay(&engine, 1), Decimal::from(1500));
        assert!(!engine.store().in_transaction());
    }

    /// PE-006: range mode accumulates the worked example
    #[test]
    fn test_report_range_income_example() {
        let mut engine = engine();

        let report = engine.report_range_income("2024-01-01", "2024-01-02").unwrap();

        assert_eq!(report.days.len(), 2);
        assert_eq!(report.income_for(WorkerId(1)), Some(Decimal::from(1500)));
        assert_eq!(report.income_for(WorkerId(2)), Some(Decimal::from(1500)));
        assert_eq!(report.income_for(WorkerId(3)), None);
        assert_eq!(
            report.day(d(2)).unwrap().share_for(WorkerId(1)),
            Some(Decimal::ZERO)
        );
    }

    /// PE-007: range mode never writes worker pay
    #[test]
    fn test_report_range_income_does_not_mutate_workers() {
        let mut engine = engine();

        engine.report_range_income("2024-01-01", "2024-01-31").unwrap();

        assert_eq!(pay(&engine, 1), Decimal::ZERO);
        assert_eq!(pay(&engine, 2), Decimal::ZERO);
        assert!(!engine.store().in_transaction());
    }

    /// PE-008: no-activity days stay in the report and contribute nothing
    #[test]
    fn test_no_activity_day_contributes_nothing() {
        let mut engine = engine();
        engine.store_mut().record_sales(10, d(3));

        let report = engine.report_range_income("2024-01-01", "2024-01-03").unwrap();

        let idle = report.day(d(3)).unwrap();
        assert_eq!(idle.status, DayStatus::NoActivity);
        assert_eq!(idle.revenue, Decimal::from(3000));
        assert_eq!(report.income_for(WorkerId(1)), Some(Decimal::from(1500)));
        assert_eq!(report.total_income().unwrap(), Decimal::from(3000));
        assert_eq!(report.total_revenue().unwrap(), Decimal::from(6000));
    }

    /// PE-009: start after end fails before any read
    #[test]
    fn test_inverted_range_is_rejected() {
        let mut engine = flaky_engine(d(9));

        let result = engine.report_range_income("2024-01-02", "2024-01-01");

        assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
        assert_eq!(engine.store().reads.get(), 0);
    }

    /// PE-010: a store failure mid-range aborts the whole range
    #[test]
    fn test_store_failure_aborts_range() {
        let mut engine = flaky_engine(d(2));

        let result = engine.report_range_income("2024-01-01", "2024-01-05");

        match result {
            Err(EngineError::StoreUnavailable { context, .. }) => {
                assert_eq!(context, "sales for 2024-01-02");
            }
            other => panic!("Expected StoreUnavailable, got {:?}", other),
        }
        assert_eq!(engine.store().reads.get(), 2);
        assert!(!engine.store().inner.in_transaction());
    }

    /// PE-011: store failure in single-day mode leaves pay untouched
    #[test]
    fn test_store_failure_in_single_day_mode() {
        let mut engine = flaky_engine(d(1));

        assert!(engine.assign_daily_pay("2024-01-01").is_err());
        assert_eq!(
            engine.store().inner.worker(WorkerId(1)).unwrap().pay,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_report_roster_holds_present_workers_only() {
        let mut engine = engine();

        let report = engine.report_range_income("2024-01-01", "2024-01-02").unwrap();

        let ids: Vec<_> = report.roster.keys().copied().collect();
        assert_eq!(ids, vec![WorkerId(1), WorkerId(2)]);
    }

    #[test]
    fn test_report_period_income_week() {
        let mut engine = engine();

        let report = engine
            .report_period_income(PayrollPeriod::Week, d(7))
            .unwrap();

        assert_eq!(report.start_date, d(1));
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.income_for(WorkerId(1)), Some(Decimal::from(1500)));
    }

    #[test]
    fn test_range_is_per_day_not_whole_range_split() {
        // Worker 3 attends only on a day without sales; a whole-range split
        // would hand them a third of the revenue.
        let mut engine = engine();
        engine.store_mut().record_attendance(WorkerId(3), d(2));

        let report = engine.report_range_income("2024-01-01", "2024-01-02").unwrap();

        assert_eq!(report.income_for(WorkerId(3)), Some(Decimal::ZERO));
        assert_eq!(report.income_for(WorkerId(2)), Some(Decimal::from(1500)));
    }

    #[test]
    fn test_export_range_report_writes_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let exporter = ReportExporter::new(dir.path(), 2);
        let mut engine = engine();

        let exported = engine
            .export_range_report("2024-01-01", "2024-01-02", &exporter)
            .unwrap();

        assert!(exported.path.exists());
        assert_eq!(exported.document.income["Ali Valiyev"], 1500.0);
        assert_eq!(exported.document.income["Bobur Karimov"], 1500.0);
        assert_eq!(
            exported.document.daily["2024-01-02"].workers,
            vec!["Ali Valiyev"]
        );
    }

    #[test]
    fn test_export_range_report_bad_range_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let exporter = ReportExporter::new(dir.path().join("out"), 2);
        let mut engine = engine();

        let result = engine.export_range_report("2024-01-05", "2024-01-01", &exporter);

        assert!(result.is_err());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_from_config_uses_unit_price() {
        let config = PayrollConfig::with_unit_price(Decimal::from(3000));
        let engine = PayrollEngine::from_config(InMemoryStore::new(), &config);
        assert_eq!(engine.unit_price(), Decimal::from(3000));
    }

    #[test]
    fn test_range_unknown_worker_names_the_day() {
        let mut engine = engine();
        engine.store_mut().record_attendance(WorkerId(77), d(2));

        match engine.report_range_income("2024-01-01", "2024-01-03") {
            Err(EngineError::WorkerNotFound { id, context }) => {
                assert_eq!(id, WorkerId(77));
                assert_eq!(context, "attendance for 2024-01-02");
            }
            other => panic!("Expected WorkerNotFound, got {:?}", other),
        }
        assert!(!engine.store().in_transaction());
    }

    #[test]
    fn test_range_income_overflow_is_calculation_error() {
        // Each day's revenue fits in a decimal; the running total does not.
        let mut store = InMemoryStore::new();
        store.add_worker(Worker::new(1, "ali", "valiyev"));
        for day in 1..=3 {
            store.record_sales(1, d(day));
            store.record_attendance(WorkerId(1), d(day));
        }
        let mut engine = PayrollEngine::new(store, Decimal::MAX / Decimal::from(2));

        assert!(engine.assign_daily_pay("2024-01-01").is_ok());

        match engine.report_range_income("2024-01-01", "2024-01-03") {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("income overflow for worker 1"), "message: {}", message);
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
        assert!(!engine.store().in_transaction());
    }
}
