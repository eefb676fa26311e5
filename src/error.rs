// src/error.rs
use std::fmt;

/// Custom error types for the sde-paths library
#[derive(Debug, Clone)]
pub enum SimError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Time grid is not a valid discretisation (t0 != 0, non-increasing, too short)
    InvalidTimeGrid { reason: String },

    /// Correlation outside [-1, 1]
    InvalidCorrelation { rho: f64 },

    /// Iteration count is zero
    InvalidIterationCount { iterations: usize },

    /// Kernel variant that is deliberately left unimplemented
    NotImplemented { operation: String },

    /// A path state became non-finite; carries the first offending lane and step
    NumericFailure { lane: usize, step: usize, value: f64 },

    /// Failure on the data-parallel backend (dispatch panic, launch failure)
    BackendFailure { reason: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            SimError::InvalidTimeGrid { reason } => {
                write!(f, "Invalid time grid: {}", reason)
            }
            SimError::InvalidCorrelation { rho } => {
                write!(f, "Invalid correlation {}: must be in [-1, 1]", rho)
            }
            SimError::InvalidIterationCount { iterations } => {
                write!(
                    f,
                    "Invalid iteration count {}: must be greater than 0",
                    iterations
                )
            }
            SimError::NotImplemented { operation } => {
                write!(f, "Not implemented: {}", operation)
            }
            SimError::NumericFailure { lane, step, value } => {
                write!(
                    f,
                    "Numeric failure: state became {} at lane {}, step {}",
                    value, lane, step
                )
            }
            SimError::BackendFailure { reason } => {
                write!(f, "Backend failure: {}", reason)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Result type alias for sde-paths operations
pub type SimResult<T> = Result<T, SimError>;

/// Validation utilities
pub mod validation {
    use super::{SimError, SimResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SimResult<()> {
        if value <= 0.0 {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SimResult<()> {
        if value < 0.0 {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            Err(SimError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate the correlation between the two Brownian drivers
    pub fn validate_correlation(rho: f64) -> SimResult<()> {
        if !rho.is_finite() || rho.abs() > 1.0 {
            Err(SimError::InvalidCorrelation { rho })
        } else {
            Ok(())
        }
    }

    /// Validate iteration (path) count
    pub fn validate_iterations(iterations: usize) -> SimResult<()> {
        if iterations == 0 {
            Err(SimError::InvalidIterationCount { iterations })
        } else {
            Ok(())
        }
    }
}
