//! loglik_optimizer::types — numeric aliases and pre-wired solver types.
//!
//! Purpose
//! -------
//! Keep the `ndarray` and argmin generics in one place so the optimizer and
//! the psychometric model talk in terms of `Theta`, `Grad`, `Hessian` and
//! `Cost` rather than backend types.
//!
//! Conventions
//! -----------
//! - `Theta`/`Grad` have one entry per free parameter (two for the logistic
//!   curve: `[α, β]`).
//! - `Hessian` doubles as the container for the Gauss–Newton information
//!   matrix `JᵀJ` before it is handed to the covariance step.
//! - `Cost` is a scalar `f64`; sign flips between cost and objective happen
//!   in the adapter.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense square matrix of second-order (or Gauss–Newton) information.
pub type Hessian = Array2<f64>;

/// Scalar objective/cost value.
pub type Cost = f64;

/// Function-evaluation counters reported by argmin (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
