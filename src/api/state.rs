//! Application state for the payroll API.
//!
//! The engine runs synchronous store transactions, so handlers take a
//! mutex around it for the duration of one payroll run.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::config::ConfigLoader;
use crate::engine::PayrollEngine;
use crate::export::ReportExporter;
use crate::store::RecordStore;

/// The store type the API serves from.
pub type SharedStore = Box<dyn RecordStore + Send>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<PayrollEngine<SharedStore>>>,
    exporter: Arc<ReportExporter>,
}

impl AppState {
    /// Creates application state from an engine and an exporter.
    pub fn new(engine: PayrollEngine<SharedStore>, exporter: ReportExporter) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            exporter: Arc::new(exporter),
        }
    }

    /// Creates application state from a store and loaded configuration.
    pub fn from_config<S>(store: S, config: &ConfigLoader) -> Self
    where
        S: RecordStore + Send + 'static,
    {
        let engine = PayrollEngine::from_config(Box::new(store) as SharedStore, config.config());
        Self::new(engine, ReportExporter::from_config(config.config()))
    }

    /// Locks the engine for one payroll run.
    ///
    /// A run that panicked poisons the lock. Its open transaction was rolled
    /// back while the panic unwound, so the lock is recovered and cleared.
    pub fn engine(&self) -> MutexGuard<'_, PayrollEngine<SharedStore>> {
        self.engine.lock().unwrap_or_else(|poisoned| {
            warn!("Recovering payroll engine after a panicked run");
            self.engine.clear_poison();
            poisoned.into_inner()
        })
    }

    /// The exporter used for range reports.
    pub fn exporter(&self) -> &ReportExporter {
        &self.exporter
    }
}
