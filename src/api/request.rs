//! Request types for the earnings API.
//!
//! Single-day endpoints take a [`WorkEntry`] as their body directly.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::WorkEntry;

/// Request body for the `/earnings/monthly` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// The entries to aggregate. Entries outside the month are ignored.
    #[serde(default)]
    pub entries: Vec<WorkEntry>,
}

impl MonthlyRequest {
    /// Checks the period.
    pub fn validate(&self) -> EngineResult<()> {
        validate_period(self.year, self.month)
    }
}

/// Query parameters of the `/standby/allowances` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandbyAllowancesQuery {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

impl StandbyAllowancesQuery {
    /// Checks the period.
    pub fn validate(&self) -> EngineResult<()> {
        validate_period(self.year, self.month)
    }
}

fn validate_period(year: i32, month: u32) -> EngineResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(EngineError::InvalidEntry {
            date: format!("{}-{:02}", year, month),
            message: format!("month {} is outside 1..=12", month),
        })
    }
}
