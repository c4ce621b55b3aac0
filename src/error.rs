//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can occur while resolving dates, reading the
//! record store, distributing pay, or exporting a report.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::WorkerId;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type. Every variant
/// carries enough context (the offending text, date, range or path) for a
/// caller to correct the input and retry.
///
/// # Example
///
/// ```
/// use sales_payroll::error::EngineError;
///
/// let error = EngineError::InvalidDateFormat {
///     input: "2024-13-01".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid date '2024-13-01': expected format YYYY-MM-DD"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Date text could not be parsed as a calendar date.
    #[error("Invalid date '{input}': expected format YYYY-MM-DD")]
    InvalidDateFormat {
        /// The text that failed to parse.
        input: String,
    },

    /// A range was requested whose start falls after its end.
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// The record store could not serve a read or accept a write.
    #[error("Record store unavailable ({context}): {message}")]
    StoreUnavailable {
        /// The operation and date being served when the store failed.
        context: String,
        /// A description of the underlying failure.
        message: String,
    },

    /// An attendance record references a worker the store does not know.
    #[error("Worker not found: {id} ({context})")]
    WorkerNotFound {
        /// The unknown worker id.
        id: WorkerId,
        /// Where the id was referenced, including the date when known.
        context: String,
    },

    /// A payroll report could not be serialized or durably written.
    #[error("Failed to export report to '{path}': {message}")]
    ExportFailure {
        /// The destination path of the report.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was parsed but is out of range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::StoreUnavailable`] for a failed store call.
    pub fn store(context: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::StoreUnavailable {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Builds a [`EngineError::WorkerNotFound`] for a failed worker lookup.
    pub fn worker_not_found(id: WorkerId) -> Self {
        EngineError::WorkerNotFound {
            id,
            context: "worker records".to_string(),
        }
    }

    /// Scopes a store or lookup failure to the collection and day being read.
    ///
    /// The context becomes `"<collection> for <date>"`. A store failure keeps
    /// its previous context in the message. Other errors pass through.
    pub fn at_date(self, collection: &str, date: NaiveDate) -> Self {
        let scoped = format!("{} for {}", collection, date);
        match self {
            EngineError::StoreUnavailable { context, message } => EngineError::StoreUnavailable {
                context: scoped,
                message: if context.is_empty() {
                    message
                } else {
                    format!("{}: {}", context, message)
                },
            },
            EngineError::WorkerNotFound { id, .. } => EngineError::WorkerNotFound {
                id,
                context: scoped,
            },
            other => other,
        }
    }

    /// Returns true for errors caused by the caller's date input.
    ///
    /// These are raised before the store is touched, so nothing has been
    /// read or written when they are returned.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidDateFormat { .. } | EngineError::InvalidRange { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
