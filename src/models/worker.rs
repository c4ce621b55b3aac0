//! Worker model and identity type.
//!
//! This module defines the [`Worker`] record and the [`WorkerId`] newtype
//! used by attendance records and payroll results to refer to workers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of a worker in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub u32);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a worker whose pay is derived from daily sales.
///
/// Names are kept exactly as they were recorded; use
/// [`Worker::display_name`] for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: WorkerId,
    /// The worker's first name.
    pub first_name: String,
    /// The worker's last name.
    pub last_name: String,
    /// The current pay figure, overwritten by single-day payroll.
    #[serde(default)]
    pub pay: Decimal,
}

impl Worker {
    /// Creates a worker with a zero pay figure.
    pub fn new(id: u32, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: WorkerId(id),
            first_name: first_name.into(),
            last_name: last_name.into(),
            pay: Decimal::ZERO,
        }
    }

    /// Returns the title-cased "First Last" name used in reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use sales_payroll::models::Worker;
    ///
    /// let worker = Worker::new(1, "ali", "VALIYEV");
    /// assert_eq!(worker.display_name(), "Ali Valiyev");
    /// ```
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            title_case(&self.first_name),
            title_case(&self.last_name)
        )
        .trim()
        .to_string()
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
