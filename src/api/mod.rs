//! HTTP API for the payroll engine.
//!
//! Three endpoints wrap the engine's operations:
//!
//! - `POST /payroll/daily` runs single-day payroll.
//! - `POST /payroll/range` builds, and optionally exports, a range report.
//! - `POST /payroll/period` builds a report for a trailing week or month.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DailyPayRequest, PeriodRequest, RangeRequest};
pub use response::{ApiError, ApiErrorResponse, DailyPayResponse, RangeReportResponse, WorkerShare};
pub use state::{AppState, SharedStore};
