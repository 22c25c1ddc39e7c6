//! Error types for the earnings engine.
//!
//! Single-day calculations never fail: malformed times, sparse settings and
//! unparseable dates degrade to zero-valued contributions. The errors below are
//! raised only at the boundaries, when settings are loaded or validated and when
//! an entry is rejected before it enters the monthly fold.

use thiserror::Error;

/// The main error type for the earnings engine.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration document could not be parsed.
    #[error("Failed to parse configuration '{path}': {message}")]
    ConfigParseError {
        /// The path (or source label) of the document that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A settings value is out of its admissible range.
    #[error("Invalid setting '{field}': {message}")]
    InvalidSettings {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A work entry was rejected before calculation.
    #[error("Invalid work entry '{date}': {message}")]
    InvalidEntry {
        /// The entry date as supplied by the caller.
        date: String,
        /// Why the entry was rejected.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
