//! Errors and failure reasons for psychometric fitting.
//!
//! Two layers are kept apart:
//!
//! - [`PsychometricError`]: configuration mistakes (bad initial slope, bad
//!   curve grid, invalid or unbounded optimizer options). Returned as `Err` from
//!   constructors.
//! - [`FitFailure`]: why a fit on *valid* configuration did not produce
//!   usable parameters. It is never raised; it travels inside a
//!   non-converged [`FitResult`](crate::psychometric::fitter::FitResult).
//!
//! [`ThresholdUnavailable`] marks a single probability that could not be
//! inverted on an otherwise valid fit.
use crate::optimization::errors::OptError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for fitter configuration.
pub type PsychometricResult<T> = Result<T, PsychometricError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PsychometricError {
    /// Initial slope must be finite and non-zero.
    InvalidInitialSlope { value: f64 },

    /// The fit must run with an iteration budget.
    UnboundedIterations,

    /// Curve sampling needs at least two points over a non-empty range.
    InvalidCurveGrid { points: usize, reason: &'static str },

    /// Optimizer options were rejected.
    Optimizer(OptError),
}

impl std::error::Error for PsychometricError {}

impl std::fmt::Display for PsychometricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PsychometricError::InvalidInitialSlope { value } => {
                write!(f, "Invalid initial slope {value}: must be finite and non-zero")
            }
            PsychometricError::UnboundedIterations => {
                write!(f, "Optimizer options must set max_iter so the fit terminates")
            }
            PsychometricError::InvalidCurveGrid { points, reason } => {
                write!(f, "Invalid curve grid with {points} points: {reason}")
            }
            PsychometricError::Optimizer(err) => write!(f, "Optimizer configuration: {err}"),
        }
    }
}

impl From<OptError> for PsychometricError {
    fn from(err: OptError) -> Self {
        PsychometricError::Optimizer(err)
    }
}

/// Machine-readable reason attached to a non-converged fit.
#[derive(Debug, Clone, PartialEq)]
pub enum FitFailure {
    // ---- Data ----
    /// No trials were recorded.
    EmptyLog,

    /// Fewer than two distinct stimulus levels were observed.
    InsufficientLevels { distinct: usize },

    /// `n - 2 <= 0`, so the residual variance is undefined.
    InsufficientDegreesOfFreedom { points: usize },

    // ---- Optimizer ----
    /// The optimizer raised an error (line-search breakdown, non-finite
    /// objective, ...).
    Optimizer(OptError),

    /// The iteration budget ran out before a tolerance was met.
    NotConverged { status: String, iterations: usize },

    // ---- Covariance ----
    /// `JᵀJ` is singular or numerically rank-deficient.
    SingularCovariance { min_eigenvalue: f64, max_eigenvalue: f64 },
}

impl std::fmt::Display for FitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitFailure::EmptyLog => write!(f, "no trials recorded"),
            FitFailure::InsufficientLevels { distinct } => {
                write!(f, "only {distinct} distinct level(s) observed, need at least 2")
            }
            FitFailure::InsufficientDegreesOfFreedom { points } => {
                write!(f, "{points} data points leave no residual degrees of freedom")
            }
            FitFailure::Optimizer(err) => write!(f, "optimizer error: {err}"),
            FitFailure::NotConverged { status, iterations } => {
                write!(f, "optimizer did not converge after {iterations} iterations ({status})")
            }
            FitFailure::SingularCovariance { min_eigenvalue, max_eigenvalue } => write!(
                f,
                "singular information matrix (eigenvalues {min_eigenvalue:e} .. {max_eigenvalue:e})"
            ),
        }
    }
}

impl From<OptError> for FitFailure {
    fn from(err: OptError) -> Self {
        FitFailure::Optimizer(err)
    }
}

/// Why one target probability has no threshold level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdUnavailable {
    /// `β == 0`: the curve is flat and cannot be inverted.
    ZeroSlope,
    /// Probability outside `(0, 1)`.
    ProbabilityOutOfRange { p: f64 },
    /// Inversion produced a non-finite level.
    NonFinite,
}

impl std::fmt::Display for ThresholdUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdUnavailable::ZeroSlope => write!(f, "slope is zero"),
            ThresholdUnavailable::ProbabilityOutOfRange { p } => {
                write!(f, "probability {p} outside (0, 1)")
            }
            ThresholdUnavailable::NonFinite => write!(f, "non-finite level"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PsychometricError> for PyErr {
    fn from(err: PsychometricError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
