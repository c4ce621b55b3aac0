//! Report export for range payroll.
//!
//! This module turns a [`PayrollReport`] into a [`ReportDocument`] and writes
//! it to disk atomically. Values are rounded to the configured currency scale
//! here and nowhere else.

mod atomic;
mod document;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollReport, WorkerId};

pub use document::{DailyEntry, ReportDocument};

/// A report that has been durably written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    /// Where the document was written.
    pub path: PathBuf,
    /// The document that was written.
    pub document: ReportDocument,
}

/// Renders and writes payroll reports.
///
/// # Example
///
/// ```no_run
/// use sales_payroll::export::ReportExporter;
///
/// let exporter = ReportExporter::new("./reports", 2);
/// # let report: sales_payroll::models::PayrollReport = unimplemented!();
/// let exported = exporter.export(&report)?;
/// println!("Wrote {}", exported.path.display());
/// # Ok::<(), sales_payroll::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReportExporter {
    directory: PathBuf,
    currency_scale: u32,
}

impl ReportExporter {
    /// Creates an exporter writing into `directory`, rounding values to
    /// `currency_scale` decimal places.
    pub fn new(directory: impl Into<PathBuf>, currency_scale: u32) -> Self {
        Self {
            directory: directory.into(),
            currency_scale,
        }
    }

    /// Creates an exporter from the engine configuration.
    pub fn from_config(config: &PayrollConfig) -> Self {
        Self::new(config.report_directory.clone(), config.currency_scale)
    }

    /// The directory reports are written into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file a report is written to: `payroll_<start>_<end>.json`.
    pub fn report_path(&self, report: &PayrollReport) -> PathBuf {
        self.directory.join(format!(
            "payroll_{}_{}.json",
            report.start_date, report.end_date
        ))
    }

    /// Renders a report into its document form.
    pub fn render(&self, report: &PayrollReport) -> EngineResult<ReportDocument> {
        let path = self.report_path(report);
        self.render_for(report, &path)
    }

    /// Renders a report into the pretty-printed JSON that [`Self::export`]
    /// writes.
    pub fn to_json(&self, document: &ReportDocument) -> EngineResult<Vec<u8>> {
        serialize(document, &self.directory)
    }

    /// Writes a report to [`Self::report_path`].
    pub fn export(&self, report: &PayrollReport) -> EngineResult<ExportedReport> {
        let path = self.report_path(report);
        self.export_to(report, &path)
    }

    /// Writes a report to an explicit path.
    ///
    /// Either the complete document is stored or nothing is: on failure the
    /// previous file at `path`, if any, is left untouched.
    pub fn export_to(&self, report: &PayrollReport, path: &Path) -> EngineResult<ExportedReport> {
        let document = self.render_for(report, path)?;
        let bytes = serialize(&document, path)?;

        if let Err(e) = atomic::write_atomic(path, &bytes) {
            warn!(path = %path.display(), error = %e, "Report export failed");
            return Err(export_failure(path, e.to_string()));
        }

        info!(
            path = %path.display(),
            days = document.daily.len(),
            workers = document.income.len(),
            bytes = bytes.len(),
            "Exported payroll report"
        );

        Ok(ExportedReport {
            path: path.to_path_buf(),
            document,
        })
    }

    fn render_for(&self, report: &PayrollReport, path: &Path) -> EngineResult<ReportDocument> {
        let labels = worker_labels(report, path)?;
        let label = |id: &WorkerId| labels[id].clone();

        let mut daily = BTreeMap::new();
        for day in &report.days {
            daily.insert(
                day.date.format("%Y-%m-%d").to_string(),
                DailyEntry {
                    revenue: self.amount(day.revenue, path)?,
                    workers: day.present.iter().map(label).collect(),
                },
            );
        }

        let mut income = BTreeMap::new();
        for (id, total) in &report.income {
            income.insert(label(id), self.amount(*total, path)?);
        }

        Ok(ReportDocument { daily, income })
    }

    fn amount(&self, value: Decimal, path: &Path) -> EngineResult<f64> {
        let rounded =
            value.round_dp_with_strategy(self.currency_scale, RoundingStrategy::MidpointAwayFromZero);
        match rounded.to_f64() {
            Some(number) if number.is_finite() => Ok(number),
            _ => Err(export_failure(
                path,
                format!("value {} cannot be written as a number", rounded),
            )),
        }
    }
}

/// Maps every worker in the report to the name used in the document.
///
/// Display names are used as-is unless two workers share one, in which case
/// each of them is suffixed with `#<id>` so their income is kept apart.
fn worker_labels(report: &PayrollReport, path: &Path) -> EngineResult<BTreeMap<WorkerId, String>> {
    let referenced: BTreeSet<WorkerId> = report
        .days
        .iter()
        .flat_map(|d| d.present.iter().copied())
        .chain(report.income.keys().copied())
        .collect();

    let mut names = BTreeMap::new();
    for id in referenced {
        let worker = report.roster.get(&id).ok_or_else(|| {
            export_failure(path, format!("worker {} is missing from the report roster", id))
        })?;
        names.insert(id, worker.display_name());
    }

    let mut uses: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names.values() {
        *uses.entry(name.as_str()).or_default() += 1;
    }

    Ok(names
        .iter()
        .map(|(id, name)| {
            let label = if uses[name.as_str()] > 1 {
                format!("{} #{}", name, id)
            } else {
                name.clone()
            };
            (*id, label)
        })
        .collect())
}

fn serialize(document: &ReportDocument, path: &Path) -> EngineResult<Vec<u8>> {
    let mut bytes =
        serde_json::to_vec_pretty(document).map_err(|e| export_failure(path, e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn export_failure(path: &Path, message: impl Into<String>) -> EngineError {
    EngineError::ExportFailure {
        path: path.display().to_string(),
        message: message.into(),
    }
}
