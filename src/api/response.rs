//! Response types for the payroll API.
//!
//! Success bodies mirror the engine's results with worker names resolved;
//! error bodies share one [`ApiError`] shape.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::export::ReportDocument;
use crate::models::{DailyOutcome, DayStatus, PayrollReport, WorkerId};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response for a body that could not be decoded.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::InvalidDateFormat { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_DATE",
                    message,
                    "Dates must be written as YYYY-MM-DD",
                ),
            ),
            EngineError::InvalidRange { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_RANGE",
                    message,
                    "The start date must not fall after the end date",
                ),
            ),
            EngineError::WorkerNotFound { id, context } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "WORKER_NOT_FOUND",
                    message,
                    format!("Worker {} has no record ({})", id, context),
                ),
            ),
            EngineError::StoreUnavailable { context, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::with_details("STORE_UNAVAILABLE", message, context),
            ),
            EngineError::ExportFailure { path, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("EXPORT_FAILED", message, path),
            ),
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        Self { status, error }
    }
}

/// One worker's share in a daily response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerShare {
    /// Worker id.
    pub worker_id: WorkerId,
    /// Display name.
    pub name: String,
    /// Share of the day's revenue.
    pub amount: Decimal,
}

/// Response body for `POST /payroll/daily`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPayResponse {
    /// The day paid out.
    pub date: String,
    /// Whether anyone was present.
    pub status: DayStatus,
    /// Total units sold.
    pub units_sold: u64,
    /// The day's revenue.
    pub revenue: Decimal,
    /// Shares assigned, in worker-id order.
    pub shares: Vec<WorkerShare>,
}

impl DailyPayResponse {
    /// Builds the response, resolving names through `names`.
    pub fn new(outcome: &DailyOutcome, names: &BTreeMap<WorkerId, String>) -> Self {
        let shares = outcome
            .shares
            .iter()
            .map(|(id, amount)| WorkerShare {
                worker_id: *id,
                name: names.get(id).cloned().unwrap_or_else(|| id.to_string()),
                amount: *amount,
            })
            .collect();
        Self {
            date: outcome.date.to_string(),
            status: outcome.status,
            units_sold: outcome.units_sold,
            revenue: outcome.revenue,
            shares,
        }
    }
}

/// Response body for range and period requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReportResponse {
    /// First day covered.
    pub start_date: String,
    /// Last day covered.
    pub end_date: String,
    /// Days on which revenue went undistributed.
    pub no_activity_days: Vec<String>,
    /// Where the report was written, when export was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_to: Option<String>,
    /// The rendered report.
    pub report: ReportDocument,
}

impl RangeReportResponse {
    /// Builds the response from a report and its rendered document.
    pub fn new(
        report: &PayrollReport,
        document: ReportDocument,
        exported_to: Option<String>,
    ) -> Self {
        Self {
            start_date: report.start_date.to_string(),
            end_date: report.end_date.to_string(),
            no_activity_days: report
                .days
                .iter()
                .filter(|day| day.is_no_activity())
                .map(|day| day.date.to_string())
                .collect(),
            exported_to,
            report: document,
        }
    }
}
