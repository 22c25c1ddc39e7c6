//! Core data models for the earnings engine.
//!
//! Input records ([`WorkEntry`]), single-day outputs ([`EarningsBreakdown`],
//! [`DailyEarnings`]), the monthly roll-up ([`MonthlySummary`]) and the audit
//! trail types.

mod audit;
mod earnings;
mod monthly_summary;
mod work_entry;

pub use audit::{AuditStep, AuditTrace, AuditWarning, NoTrace, TraceHook};
pub use earnings::{
    Allowances, BandValues, DailyEarnings, DayDetails, EarningsBreakdown, ExcessRouting,
    OrdinaryBreakdown, OrdinaryEarnings, OrdinaryHours, StandbyBreakdown, TimeBand,
    round_currency,
};
pub use monthly_summary::{
    DayCounts, MonthlySummary, OvertimeBreakdown, SkippedEntry, StandbyAllowanceDay,
};
pub use work_entry::{
    CompletionType, Intervention, LeaveKind, MAX_MEAL_CASH, MealRecord, TimeSpan, WorkEntry,
};
