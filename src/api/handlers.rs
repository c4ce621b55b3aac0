//! HTTP request handlers for the payroll API.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{DateRange, parse_date};
use crate::error::EngineResult;
use crate::models::WorkerId;
use crate::store::RecordStore;

use super::request::{DailyPayRequest, PeriodRequest, RangeRequest};
use super::response::{ApiError, ApiErrorResponse, DailyPayResponse, RangeReportResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/daily", post(daily_pay_handler))
        .route("/payroll/range", post(range_report_handler))
        .route("/payroll/period", post(period_report_handler))
        .with_state(state)
}

/// Handler for `POST /payroll/daily`.
///
/// Runs single-day payroll (today when no date is given) and returns the
/// shares assigned.
async fn daily_pay_handler(
    State(state): State<AppState>,
    payload: Result<Json<DailyPayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match decode(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    info!(%correlation_id, date = ?request.date, "Processing daily payroll request");

    let start_time = Instant::now();
    let date = match request.date.as_deref() {
        Some(text) => parse_date(text),
        None => Ok(Local::now().date_naive()),
    };
    let result = date.and_then(|date| run_daily(&state, date));
    respond(correlation_id, start_time, result)
}

/// Handler for `POST /payroll/range`.
///
/// Builds a range report and, when asked, exports it.
async fn range_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<RangeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match decode(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    info!(
        %correlation_id,
        start_date = %request.start_date,
        end_date = %request.end_date,
        export = request.export,
        "Processing range payroll request"
    );

    let start_time = Instant::now();
    let result = DateRange::parse(&request.start_date, &request.end_date)
        .and_then(|range| run_range(&state, range, request.export));
    respond(correlation_id, start_time, result)
}

/// Handler for `POST /payroll/period`.
///
/// Resolves a trailing week or month ending on the given day (or today) and
/// builds its report.
async fn period_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match decode(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    info!(%correlation_id, period = ?request.period, "Processing period payroll request");

    let start_time = Instant::now();
    let end = match request.end_date.as_deref() {
        Some(text) => parse_date(text),
        None => Ok(Local::now().date_naive()),
    };
    let result = end.and_then(|end| run_range(&state, request.period.ending_on(end), false));
    respond(correlation_id, start_time, result)
}

fn run_daily(state: &AppState, date: NaiveDate) -> EngineResult<DailyPayResponse> {
    let mut engine = state.engine();
    let outcome = engine.assign_daily_pay_on(date)?;
    let names = worker_names(engine.store(), outcome.shares.keys().copied())?;
    Ok(DailyPayResponse::new(&outcome, &names))
}

fn run_range(state: &AppState, range: DateRange, export: bool) -> EngineResult<RangeReportResponse> {
    let report = state.engine().report_income(range)?;
    let exporter = state.exporter();
    if export {
        let exported = exporter.export(&report)?;
        let path = exported.path.display().to_string();
        Ok(RangeReportResponse::new(&report, exported.document, Some(path)))
    } else {
        let document = exporter.render(&report)?;
        Ok(RangeReportResponse::new(&report, document, None))
    }
}

fn worker_names<S: RecordStore + ?Sized>(
    store: &S,
    ids: impl Iterator<Item = WorkerId>,
) -> EngineResult<BTreeMap<WorkerId, String>> {
    ids.map(|id| Ok((id, store.worker(id)?.display_name())))
        .collect()
}

fn respond<T: Serialize>(
    correlation_id: Uuid,
    start_time: Instant,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                %correlation_id,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll request completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(%correlation_id, error = %err, "Payroll request failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn decode<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(%correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(%correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}
