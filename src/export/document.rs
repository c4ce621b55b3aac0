//! Exported report document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One day's entry in an exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// The day's revenue, rounded to the currency scale.
    pub revenue: f64,
    /// Names of the workers present, in worker-id order.
    pub workers: Vec<String>,
}

/// The durable form of a range payroll report.
///
/// ```text
/// {
///   "daily":  { "2024-01-01": { "revenue": 3000.0, "workers": ["Ali Valiyev"] } },
///   "income": { "Ali Valiyev": 3000.0 }
/// }
/// ```
///
/// Both sections are ordered maps, so rendering the same report twice
/// produces the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Per-day revenue and attendance, keyed by `YYYY-MM-DD`.
    pub daily: BTreeMap<String, DailyEntry>,
    /// Accumulated income keyed by worker name.
    pub income: BTreeMap<String, f64>,
}
