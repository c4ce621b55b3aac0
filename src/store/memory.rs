//! In-memory record store.
//!
//! Holds workers, attendance and sales in ordered maps keyed by id and date.
//! It can be seeded from a JSON [`RecordSnapshot`], which is how the HTTP
//! service and the tests load fixture data.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, SalesRecord, Worker, WorkerId};

use super::RecordStore;

/// Serializable dump of every record collection.
///
/// # Example
///
/// ```
/// use sales_payroll::store::{InMemoryStore, RecordSnapshot};
///
/// let json = r#"{
///     "workers": [{ "id": 1, "first_name": "ali", "last_name": "valiyev" }],
///     "attendance": [{ "worker_id": 1, "date": "2024-01-01" }],
///     "sales": [{ "units_sold": 4, "date": "2024-01-01" }]
/// }"#;
/// let snapshot: RecordSnapshot = serde_json::from_str(json).unwrap();
/// let store = InMemoryStore::from_snapshot(snapshot);
/// assert_eq!(store.worker_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Registered workers.
    #[serde(default)]
    pub workers: Vec<Worker>,
    /// Attendance facts.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Sales facts.
    #[serde(default)]
    pub sales: Vec<SalesRecord>,
}

/// A [`RecordStore`] backed by ordered in-memory maps.
///
/// Transactions snapshot the worker table on `begin` and restore it on
/// `rollback`; pay figures are the only thing the engine writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    workers: BTreeMap<WorkerId, Worker>,
    attendance: BTreeMap<NaiveDate, Vec<WorkerId>>,
    sales: BTreeMap<NaiveDate, Vec<u32>>,
    saved_workers: Option<BTreeMap<WorkerId, Worker>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding every record in the snapshot.
    pub fn from_snapshot(snapshot: RecordSnapshot) -> Self {
        let mut store = Self::new();
        for worker in snapshot.workers {
            store.add_worker(worker);
        }
        for record in snapshot.attendance {
            store.record_attendance(record.worker_id, record.date);
        }
        for record in snapshot.sales {
            store.record_sales(record.units_sold, record.date);
        }
        store
    }

    /// Loads a store from a JSON snapshot file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let context = format!("records file {}", path.display());

        let content =
            fs::read_to_string(path).map_err(|e| EngineError::store(&context, e.to_string()))?;
        let snapshot: RecordSnapshot = serde_json::from_str(&content)
            .map_err(|e| EngineError::store(&context, e.to_string()))?;

        debug!(
            path = %path.display(),
            workers = snapshot.workers.len(),
            attendance = snapshot.attendance.len(),
            sales = snapshot.sales.len(),
            "Loaded record snapshot"
        );

        Ok(Self::from_snapshot(snapshot))
    }

    /// Dumps every collection, ordered by id and date.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            workers: self.workers.values().cloned().collect(),
            attendance: self
                .attendance
                .iter()
                .flat_map(|(date, ids)| {
                    ids.iter().map(|&worker_id| AttendanceRecord {
                        worker_id,
                        date: *date,
                    })
                })
                .collect(),
            sales: self
                .sales
                .iter()
                .flat_map(|(date, counts)| {
                    counts.iter().map(|&units_sold| SalesRecord {
                        units_sold,
                        date: *date,
                    })
                })
                .collect(),
        }
    }

    /// Registers a worker, replacing any worker with the same id.
    pub fn add_worker(&mut self, worker: Worker) {
        self.workers.insert(worker.id, worker);
    }

    /// Records that a worker attended on a date.
    pub fn record_attendance(&mut self, worker_id: WorkerId, date: NaiveDate) {
        self.attendance.entry(date).or_default().push(worker_id);
    }

    /// Records units sold on a date.
    pub fn record_sales(&mut self, units_sold: u32, date: NaiveDate) {
        self.sales.entry(date).or_default().push(units_sold);
    }

    /// Iterates over registered workers in id order.
    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.workers.values()
    }

    /// Number of registered workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Returns true while a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.saved_workers.is_some()
    }
}

impl RecordStore for InMemoryStore {
    fn sales_for_date(&self, date: NaiveDate) -> EngineResult<Vec<u32>> {
        Ok(self.sales.get(&date).cloned().unwrap_or_default())
    }

    fn attendance_for_date(&self, date: NaiveDate) -> EngineResult<Vec<WorkerId>> {
        Ok(self.attendance.get(&date).cloned().unwrap_or_default())
    }

    fn worker(&self, id: WorkerId) -> EngineResult<Worker> {
        self.workers
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::worker_not_found(id))
    }

    fn update_worker_pay(&mut self, id: WorkerId, amount: Decimal) -> EngineResult<()> {
        let worker = self
            .workers
            .get_mut(&id)
            .ok_or_else(|| EngineError::worker_not_found(id))?;
        worker.pay = amount;
        Ok(())
    }

    fn begin(&mut self) -> EngineResult<()> {
        if self.saved_workers.is_some() {
            return Err(EngineError::store(
                "begin transaction",
                "a transaction is already open",
            ));
        }
        self.saved_workers = Some(self.workers.clone());
        Ok(())
    }

    fn commit(&mut self) -> EngineResult<()> {
        match self.saved_workers.take() {
            Some(_) => Ok(()),
            None => Err(EngineError::store("commit transaction", "no open transaction")),
        }
    }

    fn rollback(&mut self) {
        if let Some(saved) = self.saved_workers.take() {
            self.workers = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_sales_for_date_returns_every_record() {
        let mut store = InMemoryStore::new();
        store.record_sales(4, d(1));
        store.record_sales(6, d(1));
        store.record_sales(9, d(2));

        assert_eq!(store.sales_for_date(d(1)).unwrap(), vec![4, 6]);
        assert_eq!(store.sales_for_date(d(3)).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_attendance_keeps_duplicates() {
        let mut store = InMemoryStore::new();
        store.record_attendance(WorkerId(1), d(1));
        store.record_attendance(WorkerId(1), d(1));

        assert_eq!(
            store.attendance_for_date(d(1)).unwrap(),
            vec![WorkerId(1), WorkerId(1)]
        );
    }

    #[test]
    fn test_unknown_worker_returns_worker_not_found() {
        let store = InMemoryStore::new();
        match store.worker(WorkerId(3)) {
            Err(EngineError::WorkerNotFound { id, .. }) => assert_eq!(id, WorkerId(3)),
            other => panic!("Expected WorkerNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_begin_twice_fails() {
        let mut store = InMemoryStore::new();
        store.begin().unwrap();
        assert!(matches!(
            store.begin(),
            Err(EngineError::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn test_commit_without_begin_fails() {
        let mut store = InMemoryStore::new();
        assert!(store.commit().is_err());
    }

    #[test]
    fn test_rollback_restores_pay() {
        let mut store = InMemoryStore::new();
        store.add_worker(Worker::new(1, "ali", "valiyev"));

        store.begin().unwrap();
        store
            .update_worker_pay(WorkerId(1), Decimal::from(10))
            .unwrap();
        store.rollback();

        assert_eq!(store.worker(WorkerId(1)).unwrap().pay, Decimal::ZERO);
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_snapshot_round_trips_through_store() {
        let mut store = InMemoryStore::new();
        store.add_worker(Worker::new(2, "bobur", "aliyev"));
        store.add_worker(Worker::new(1, "ali", "valiyev"));
        store.record_attendance(WorkerId(2), d(2));
        store.record_attendance(WorkerId(1), d(1));
        store.record_sales(3, d(1));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.workers[0].id, WorkerId(1));
        assert_eq!(snapshot.attendance[0].date, d(1));

        let rebuilt = InMemoryStore::from_snapshot(snapshot.clone());
        assert_eq!(rebuilt.snapshot(), snapshot);
    }

    #[test]
    fn test_load_json_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "workers": [{{ "id": 1, "first_name": "ali", "last_name": "valiyev" }}],
                "sales": [{{ "units_sold": 5, "date": "2024-01-01" }}]
            }}"#
        )
        .unwrap();

        let store = InMemoryStore::load_json(file.path()).unwrap();
        assert_eq!(store.worker_count(), 1);
        assert_eq!(store.sales_for_date(d(1)).unwrap(), vec![5]);
        assert!(store.attendance_for_date(d(1)).unwrap().is_empty());
    }

    #[test]
    fn test_load_json_missing_file_is_store_unavailable() {
        let result = InMemoryStore::load_json("/nonexistent/records.json");
        match result {
            Err(EngineError::StoreUnavailable { context, .. }) => {
                assert!(context.contains("records.json"));
            }
            other => panic!("Expected StoreUnavailable, got {:?}", other.map(|_| ())),
        }
    }
}
