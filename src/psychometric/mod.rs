//! psychometric — logistic psychometric-function fitting and thresholds.
//!
//! Purpose
//! -------
//! Turn a finished session's trial log into a psychometric curve: per-level
//! proportions, a least-squares logistic fit with standard errors and a 95%
//! interval for the 50% level, and thresholds at target probabilities.
//!
//! Key behaviors
//! -------------
//! - [`aggregate`]: group trials by presented level and guard against
//!   nearly-degenerate data with synthetic anchors.
//! - [`model`]: the logistic curve `f(x; α, β)` and its `-½·SSR` objective
//!   for the L-BFGS maximizer.
//! - [`fitter`]: runs the fit and reports a [`FitResult`] that always
//!   carries a `converged` flag and, on failure, a [`FitFailure`].
//! - [`covariance`]: `s² (JᵀJ)⁻¹` via a symmetric eigendecomposition.
//! - [`threshold`]: inverts the curve at target probabilities.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fitting never panics and never returns `Err` on a valid configuration;
//!   failures are data.
//! - A non-converged fit has NaN estimates and an empty threshold table.
//!
//! Conventions
//! -----------
//! - Proportions are shares of "too large" responses (code 1).
//! - `α` is in level units, `β` in inverse level units.

pub mod aggregate;
pub mod covariance;
pub mod errors;
pub mod fitter;
pub mod model;
pub mod threshold;

pub use self::aggregate::{CurveData, LevelProportion, aggregate, stabilize};
pub use self::errors::{FitFailure, PsychometricError, PsychometricResult, ThresholdUnavailable};
pub use self::fitter::{FitOptions, FitResult, PsychometricFitter};
pub use self::model::{LogisticModel, logistic};
pub use self::threshold::{ThresholdEntry, ThresholdReporter, ThresholdTable, threshold_level};

pub mod prelude {
    pub use super::aggregate::{LevelProportion, aggregate};
    pub use super::errors::{
        FitFailure, PsychometricError, PsychometricResult, ThresholdUnavailable,
    };
    pub use super::fitter::{FitOptions, FitResult, PsychometricFitter};
    pub use super::model::logistic;
    pub use super::threshold::{ThresholdEntry, ThresholdReporter, ThresholdTable};
}
