//! optimization — argmin-backed objective maximization and numerical helpers.
//!
//! Purpose
//! -------
//! Provide the optimization layer used by the psychometric fitter: an
//! Argmin-backed L-BFGS maximizer for user objectives, a set of numerically
//! stable scalar transforms, and a single error/result surface. Callers
//! implement an objective `ℓ(θ)`, choose tolerances, and obtain fitted
//! parameters and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing objectives** `ℓ(θ)`
//!   (`loglik_optimizer`), including solver choice and stopping criteria.
//!   Least-squares problems are expressed as `ℓ(θ) = -½·SSR(θ)`.
//! - Supply shared numerical primitives (`numerical_stability`) such as an
//!   overflow-free logistic and its inverse.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and assume
//!   finite inputs once validation has passed; invalid states are reported
//!   as `OptError`, not panics.
//! - Every run has a finite iteration budget (`Tolerances::max_iter`), so
//!   `maximize` always returns.
//!
//! Conventions
//! -----------
//! - Solvers conceptually maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user-facing outcomes are expressed in terms of `ℓ`.
//! - Parameters and gradients use the `ndarray` aliases `Theta`, `Grad`,
//!   `Hessian`.
//! - This module and its submodules avoid I/O and logging; the optional
//!   `obs_slog` feature attaches argmin's terminal observer when
//!   `MLEOptions::verbose` is set.
//!
//! Downstream usage
//! ----------------
//! - The psychometric layer implements `LogLikelihood` for its logistic
//!   least-squares model and calls `maximize`.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: solver wiring,
//!   tolerance validation, adapter sign conventions and finite-difference
//!   fallbacks, stable transforms, and error conversions.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_psychophysics::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
