//! High-level entry point for maximizing a [`LogLikelihood`] objective.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS and the line search chosen in `opts`.
///
/// # Behavior
/// - Calls `f.check(&theta0, data)` once; a rejection aborts before any
///   solver work.
/// - Wraps `(f, data)` in an [`ArgMinAdapter`] so argmin minimizes `-ℓ(θ)`.
/// - Builds the More–Thuente or Hager–Zhang L-BFGS solver and runs it with
///   the configured iteration budget.
///
/// # Errors
/// Propagates `check` rejections, builder failures, and runtime failures
/// (line-search breakdowns, non-finite costs) as [`OptError`](crate::optimization::errors::OptError).
/// Exhausting `max_iter` is *not* an error: it is reported through
/// [`OptimOutcome::converged`] being `false`.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_psychophysics::optimization::errors::OptResult;
/// use rust_psychophysics::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_psychophysics::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
