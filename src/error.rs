//! Error taxonomy for the calculation core

use thiserror::Error;

/// Errors raised at component boundaries during input validation.
///
/// Convergence problems are deliberately not represented here: the IRR
/// solver always returns a best-effort estimate with flags rather than
/// failing (see `forecast::irr`).
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed or out-of-range mortgage input
    #[error("invalid input: {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// Forecast assumption outside the allowed range
    #[error("invalid assumption: {field} is {value}, must be finite and at least -1")]
    InvalidAssumption { field: &'static str, value: f64 },
}

impl ForecastError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        ForecastError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
