//! HTTP request handlers for the earnings API.
//!
//! This module contains the handler functions for all API endpoints. The
//! handlers only parse, validate and delegate; every number comes from the
//! calculation module.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_daily_earnings, calculate_earnings_breakdown_traced,
    calculate_monthly_standby_allowances, calculate_monthly_summary_parallel,
};
use crate::error::EngineError;
use crate::models::WorkEntry;

use super::request::{MonthlyRequest, StandbyAllowancesQuery};
use super::response::{
    ApiError, ApiErrorResponse, BreakdownResponse, DailyResponse, MonthlyResponse,
    StandbyAllowancesResponse,
};
use super::state::AppState;

const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/earnings/breakdown", post(breakdown_handler))
        .route("/earnings/daily", post(daily_handler))
        .route("/earnings/monthly", post(monthly_handler))
        .route("/standby/allowances", get(standby_allowances_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a body rejection to a 400 response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(ApiErrorResponse::bad_request(error))
}

/// Rejects an entry the engine cannot degrade around.
fn validate_entry(correlation_id: Uuid, entry: &WorkEntry) -> Result<(), Response> {
    entry.validate().map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            date = %entry.date,
            error = %err,
            "Entry rejected"
        );
        error_response(err.into())
    })
}

/// Handler for POST /earnings/breakdown.
///
/// Returns the rounded breakdown together with its audit trace.
async fn breakdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkEntry>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing breakdown request");

    let entry = match payload {
        Ok(Json(entry)) => entry,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    if let Err(response) = validate_entry(correlation_id, &entry) {
        return response;
    }

    let start_time = Instant::now();
    let (breakdown, audit_trace) = calculate_earnings_breakdown_traced(&entry, state.settings());
    info!(
        correlation_id = %correlation_id,
        date = %entry.date,
        total = %breakdown.total_earnings,
        warnings = audit_trace.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Breakdown completed"
    );

    json_response(
        StatusCode::OK,
        BreakdownResponse {
            calculation_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            breakdown: breakdown.rounded(),
            audit_trace,
        },
    )
}

/// Handler for POST /earnings/daily.
async fn daily_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkEntry>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing daily request");

    let entry = match payload {
        Ok(Json(entry)) => entry,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    if let Err(response) = validate_entry(correlation_id, &entry) {
        return response;
    }

    let earnings = calculate_daily_earnings(&entry, state.settings());
    info!(
        correlation_id = %correlation_id,
        date = %entry.date,
        total = %earnings.total,
        "Daily earnings completed"
    );

    json_response(
        StatusCode::OK,
        DailyResponse {
            calculation_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            earnings: earnings.rounded(),
        },
    )
}

/// Handler for POST /earnings/monthly.
///
/// The fold runs on the blocking pool; invalid entries are reported in the
/// summary's `skipped` list rather than failing the request.
async fn monthly_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing monthly request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    if let Err(err) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %err, "Period rejected");
        return error_response(err.into());
    }

    let start_time = Instant::now();
    let config = state.shared_config();
    let MonthlyRequest {
        year,
        month,
        entries,
    } = request;
    let joined = tokio::task::spawn_blocking(move || {
        calculate_monthly_summary_parallel(&entries, config.settings(), month, year)
    })
    .await;

    match joined {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                year,
                month,
                days = summary.days.len(),
                skipped = summary.skipped.len(),
                total = %summary.total_earnings,
                duration_us = start_time.elapsed().as_micros(),
                "Monthly summary completed"
            );
            json_response(
                StatusCode::OK,
                MonthlyResponse {
                    calculation_id: correlation_id,
                    timestamp: Utc::now(),
                    engine_version: ENGINE_VERSION.to_string(),
                    summary: summary.rounded(),
                },
            )
        }
        Err(join_error) => {
            let err = EngineError::CalculationError {
                message: join_error.to_string(),
            };
            warn!(correlation_id = %correlation_id, error = %err, "Monthly summary failed");
            error_response(err.into())
        }
    }
}

/// Handler for GET /standby/allowances.
async fn standby_allowances_handler(
    State(state): State<AppState>,
    query: Result<Query<StandbyAllowancesQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Query rejected"
            );
            return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
                rejection.body_text(),
            )));
        }
    };
    if let Err(err) = query.validate() {
        warn!(correlation_id = %correlation_id, error = %err, "Period rejected");
        return error_response(err.into());
    }

    let days = calculate_monthly_standby_allowances(query.year, query.month, state.settings());
    let total: Decimal = days.iter().map(|day| day.allowance).sum();
    info!(
        correlation_id = %correlation_id,
        year = query.year,
        month = query.month,
        days = days.len(),
        total = %total,
        "Standby allowances listed"
    );

    json_response(
        StatusCode::OK,
        StandbyAllowancesResponse {
            year: query.year,
            month: query.month,
            days,
            total,
        },
    )
}
