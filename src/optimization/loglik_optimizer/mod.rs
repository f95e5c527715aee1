//! loglik_optimizer — argmin-powered L-BFGS maximizer.
//!
//! Purpose
//! -------
//! Maximize a user objective `ℓ(θ)` with L-BFGS. Models implement
//! [`LogLikelihood`] and call [`maximize`]; the psychometric curve fitter is
//! the main client and plugs in its least-squares criterion as
//! `ℓ(θ) = -½·SSR(θ)`.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)` and supplies finite-difference gradients when the model
//!   has no analytic one.
//! - [`builders`] construct L-BFGS with More–Thuente or Hager–Zhang line
//!   search; [`run::run_lbfgs`] executes under a bounded iteration budget.
//! - [`OptimOutcome`] distinguishes tolerance-based convergence from
//!   running out of iterations.
//! - [`validation`] centralizes finiteness and shape checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Model `value`/`grad` report invalid inputs as [`OptError`](crate::optimization::errors::OptError),
//!   never by panicking.
//! - Configuration types are validated on construction.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions, finite-difference fallback,
//!   solver construction, option validation and the convergence mapping;
//!   `api` tests run full solves on a concave quadratic.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Hessian, Theta};
}
