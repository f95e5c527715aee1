//! numerical_stability — overflow-safe scalar transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the small numerical building blocks the psychometric model relies
//! on: a logistic function that never overflows, its inverse (the logit), and
//! the eigenvalue floor used when inverting information matrices.
//!
//! Key behaviors
//! -------------
//! - `safe_logistic` maps ℝ → (0, 1) without evaluating `exp` of a large
//!   positive argument.
//! - `logit` maps (0, 1) → ℝ and returns `NaN` outside the open interval.
//! - `EIGEN_EPS` is the relative floor below which an eigenvalue is treated
//!   as numerically zero.
//!
//! Conventions
//! -----------
//! - All routines are pure `f64` helpers with no I/O, allocation, or global
//!   state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare the stable forms with naïve
//!   formulas on safe grids and check tail behavior.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, logit, safe_logistic};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, logit, safe_logistic};
}
