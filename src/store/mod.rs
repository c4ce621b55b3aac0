//! Record store abstraction used by the payroll engine.
//!
//! The engine never talks to a database directly. It is handed a
//! [`RecordStore`] and reads sales and attendance through it, writing back
//! only worker pay figures. Each payroll operation runs inside one
//! [`Transaction`], which rolls back automatically unless committed.

mod memory;

use std::ops::{Deref, DerefMut};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Worker, WorkerId};

pub use memory::{InMemoryStore, RecordSnapshot};

/// Read and write surface the payroll engine needs from persistence.
///
/// Implementations must support lookup by exact calendar date. Failures are
/// reported as [`crate::error::EngineError::StoreUnavailable`], or
/// [`crate::error::EngineError::WorkerNotFound`] for unknown workers.
pub trait RecordStore {
    /// Unit counts of every sales record on the date.
    fn sales_for_date(&self, date: NaiveDate) -> EngineResult<Vec<u32>>;

    /// Worker references of every attendance record on the date, duplicates
    /// included.
    fn attendance_for_date(&self, date: NaiveDate) -> EngineResult<Vec<WorkerId>>;

    /// Looks up a single worker.
    fn worker(&self, id: WorkerId) -> EngineResult<Worker>;

    /// Overwrites a worker's current pay figure.
    fn update_worker_pay(&mut self, id: WorkerId, amount: Decimal) -> EngineResult<()>;

    /// Opens a transaction.
    fn begin(&mut self) -> EngineResult<()>;

    /// Makes every write since [`RecordStore::begin`] durable.
    fn commit(&mut self) -> EngineResult<()>;

    /// Discards every write since [`RecordStore::begin`].
    fn rollback(&mut self);
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn sales_for_date(&self, date: NaiveDate) -> EngineResult<Vec<u32>> {
        (**self).sales_for_date(date)
    }

    fn attendance_for_date(&self, date: NaiveDate) -> EngineResult<Vec<WorkerId>> {
        (**self).attendance_for_date(date)
    }

    fn worker(&self, id: WorkerId) -> EngineResult<Worker> {
        (**self).worker(id)
    }

    fn update_worker_pay(&mut self, id: WorkerId, amount: Decimal) -> EngineResult<()> {
        (**self).update_worker_pay(id, amount)
    }

    fn begin(&mut self) -> EngineResult<()> {
        (**self).begin()
    }

    fn commit(&mut self) -> EngineResult<()> {
        (**self).commit()
    }

    fn rollback(&mut self) {
        (**self).rollback()
    }
}

/// A store transaction that rolls back when dropped uncommitted.
///
/// Dereferences to the underlying store so reads and writes go through the
/// guard for the lifetime of the operation.
///
/// # Example
///
/// ```
/// use sales_payroll::models::{Worker, WorkerId};
/// use sales_payroll::store::{InMemoryStore, RecordStore, Transaction};
/// use rust_decimal::Decimal;
///
/// let mut store = InMemoryStore::new();
/// store.add_worker(Worker::new(1, "ali", "valiyev"));
///
/// {
///     let mut tx = Transaction::begin(&mut store).unwrap();
///     tx.update_worker_pay(WorkerId(1), Decimal::from(500)).unwrap();
///     // dropped without commit
/// }
///
/// assert_eq!(store.worker(WorkerId(1)).unwrap().pay, Decimal::ZERO);
/// ```
pub struct Transaction<'a, S: RecordStore + ?Sized> {
    store: &'a mut S,
    committed: bool,
}

impl<'a, S: RecordStore + ?Sized> Transaction<'a, S> {
    /// Opens a transaction on the store.
    pub fn begin(store: &'a mut S) -> EngineResult<Self> {
        store.begin()?;
        Ok(Self {
            store,
            committed: false,
        })
    }

    /// Commits the transaction.
    ///
    /// If the store refuses the commit, the guard still rolls back on drop.
    pub fn commit(mut self) -> EngineResult<()> {
        self.store.commit()?;
        self.committed = true;
        Ok(())
    }
}

impl<S: RecordStore + ?Sized> Deref for Transaction<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<S: RecordStore + ?Sized> DerefMut for Transaction<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.store
    }
}

impl<S: RecordStore + ?Sized> Drop for Transaction<'_, S> {
    fn drop(&mut self) {
        if !self.committed {
            self.store.rollback();
        }
    }
}
