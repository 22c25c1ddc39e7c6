//! HTTP API module for the earnings engine.
//!
//! A thin axum adapter over the calculation module: single-day breakdowns,
//! daily totals, monthly summaries and the on-call indemnity calendar.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{MonthlyRequest, StandbyAllowancesQuery};
pub use response::{
    ApiError, ApiErrorResponse, BreakdownResponse, DailyResponse, MonthlyResponse,
    StandbyAllowancesResponse,
};
pub use state::AppState;
