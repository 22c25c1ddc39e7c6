//! Earnings engine for the Italian CCNL Metalmeccanico PMI
//!
//! This crate computes daily and monthly earnings for a worker under the
//! metalworking collective agreement: ordinary days with the 8-hour threshold,
//! Saturday, Sunday and holiday bonuses, on-call (reperibilità) interventions
//! split into night and holiday bands, and the travel, on-call and meal
//! allowances. Every calculation records an audit trail of the rules it applied.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
