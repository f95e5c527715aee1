//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Hide argmin's generic wiring behind two builders, one per line search,
//! and apply the tolerances from [`MLEOptions`] in a single shared helper.
//!
//! Conventions
//! -----------
//! - Builders never set `θ₀` or the iteration cap; both belong to the runner
//!   ([`run_lbfgs`](super::run::run_lbfgs)).
//! - Tolerances rejected by argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   through the crate's `From<argmin::core::Error>` conversion.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search and the configured tolerances.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search and the configured tolerances.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply `tol_grad` / `tol_cost` when present; absent ones keep argmin's
/// defaults.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover construction of both L-BFGS variants with default and
    // explicit memory, and tolerance wiring through `configure_lbfgs`.
    //
    // They intentionally DO NOT cover executor behavior, which is exercised
    // by the `api` tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure both builders succeed with the default curve-fit options.
    //
    // Given
    // -----
    // - `MLEOptions::default()` (tol_grad, tol_cost and max_iter all set).
    //
    // Expect
    // ------
    // - Both builders return `Ok(_)`.
    fn builders_accept_default_options() {
        let opts = MLEOptions::default();

        assert!(build_optimizer_more_thuente(&opts).is_ok());
        assert!(build_optimizer_hager_zhang(&opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify that explicit L-BFGS memory sizes are accepted.
    //
    // Given
    // -----
    // - Options with `lbfgs_mem = Some(3)` for each line search.
    //
    // Expect
    // ------
    // - Both builders return `Ok(_)`.
    fn builders_respect_explicit_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(25)).expect("Tolerances should be valid");
        let hz = MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(3))
            .expect("MLEOptions should be valid");
        let mt = MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(3))
            .expect("MLEOptions should be valid");

        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        assert!(build_optimizer_more_thuente(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Confirm `configure_lbfgs` works when only an iteration cap is given.
    //
    // Given
    // -----
    // - Tolerances with `tol_grad = None`, `tol_cost = None`, `max_iter = 50`.
    //
    // Expect
    // ------
    // - `configure_lbfgs` returns `Ok(_)`.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None)
            .expect("MLEOptions should be valid");

        assert!(configure_lbfgs(raw, &opts).is_ok());
    }
}
