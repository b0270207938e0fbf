//! Input validation shared by the checked entry points.
//!
//! The numerical cores themselves never validate: bad inputs flow through as
//! NaN/Inf. Callers that want typed failures go through `validate()` or the
//! `try_*` wrappers built on it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("spatial step h = {step} leaves no grid cells on a rod of length {length}")]
    NoGridCells { length: f64, step: f64 },
    #[error("time step dt = {dt} exceeds total time {total_time}; no steps would run")]
    NoTimeSteps { total_time: f64, dt: f64 },
    #[error("{name} ladder must contain at least one step size")]
    EmptyLadder { name: &'static str },
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NotFinite { name, value })
    }
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NotPositive { name, value })
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::Negative { name, value })
    }
}

/// Every entry must be a positive step size and the ladder must not be empty.
pub(crate) fn require_ladder(name: &'static str, ladder: &[f64]) -> Result<(), ParameterError> {
    if ladder.is_empty() {
        return Err(ParameterError::EmptyLadder { name });
    }
    ladder.iter().try_for_each(|&value| require_positive(name, value))
}
