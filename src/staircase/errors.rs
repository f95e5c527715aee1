//! Errors for staircase sessions (configuration checks and runtime misuse).
//!
//! [`StaircaseError`] covers construction-time validation of bounds, steps,
//! stop rules and dithering, plus the runtime failures of a session: an
//! out-of-range response code, an unknown staircase id, or interaction with
//! a session that has already stopped. With the `python-bindings` feature it
//! converts into a Python `ValueError`.
//!
//! ## Conventions
//! - Staircase ids are **0-based** ordinals.
//! - Trial indices are **1-based**.
//! - A configuration error is fatal for the session being built; runtime
//!   errors leave all session state untouched.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for staircase operations.
pub type StaircaseResult<T> = Result<T, StaircaseError>;

#[derive(Debug, Clone, PartialEq)]
pub enum StaircaseError {
    // ---- Configuration ----
    /// Level bounds must satisfy `min < max`.
    InvalidBounds { min: i64, max: i64, reason: &'static str },

    /// Step sizes must be strictly positive and ordered.
    InvalidStep { name: &'static str, value: i64, reason: &'static str },

    /// Halving threshold must be positive.
    InvalidTargetInversions { value: u32, reason: &'static str },

    /// A stop clause carries a non-positive threshold.
    InvalidStopRule { name: &'static str, value: u32, reason: &'static str },

    /// No stop clause is enabled, so the session could never end.
    NoStopRule,

    /// Dither probability must lie in `[0, 1]`.
    InvalidDitherProbability { value: f64 },

    /// Target probabilities must lie strictly inside `(0, 1)`.
    InvalidTargetProbability { value: f64 },

    /// At least one staircase is required.
    NoStaircases,

    // ---- Runtime ----
    /// Responses are coded 0 ("too small") or 1 ("too large").
    InvalidResponse { value: i64 },

    /// Staircase id outside `0..count`.
    UnknownStaircase { id: usize, count: usize },

    /// The stop predicate has fired; the session is read-only.
    SessionFinished,

    /// The presentation collaborator could not produce a response.
    PresenterFailed { reason: String },

    /// Trial indices in a log must be strictly increasing from 1.
    NonMonotonicTrialIndex { index: u32, previous: u32 },
}

impl std::error::Error for StaircaseError {}

impl std::fmt::Display for StaircaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            StaircaseError::InvalidBounds { min, max, reason } => {
                write!(f, "Invalid level bounds [{min}, {max}]: {reason}")
            }
            StaircaseError::InvalidStep { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            StaircaseError::InvalidTargetInversions { value, reason } => {
                write!(f, "Invalid target inversions {value}: {reason}")
            }
            StaircaseError::InvalidStopRule { name, value, reason } => {
                write!(f, "Invalid stop rule {name} = {value}: {reason}")
            }
            StaircaseError::NoStopRule => {
                write!(f, "At least one stop rule must be enabled")
            }
            StaircaseError::InvalidDitherProbability { value } => {
                write!(f, "Invalid dither probability {value}: must lie in [0, 1]")
            }
            StaircaseError::InvalidTargetProbability { value } => {
                write!(f, "Invalid target probability {value}: must lie in (0, 1)")
            }
            StaircaseError::NoStaircases => {
                write!(f, "A session needs at least one staircase")
            }

            // ---- Runtime ----
            StaircaseError::InvalidResponse { value } => {
                write!(f, "Invalid response {value}: expected 0 or 1")
            }
            StaircaseError::UnknownStaircase { id, count } => {
                write!(f, "Unknown staircase {id}: session has {count} staircases")
            }
            StaircaseError::SessionFinished => {
                write!(f, "Session has finished; no further trials are accepted")
            }
            StaircaseError::PresenterFailed { reason } => {
                write!(f, "Presenter failed: {reason}")
            }
            StaircaseError::NonMonotonicTrialIndex { index, previous } => {
                write!(f, "Trial index {index} does not follow previous index {previous}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<StaircaseError> for PyErr {
    fn from(err: StaircaseError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
