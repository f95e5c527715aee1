//! PsychometricFitter — least-squares logistic fit of a trial log.
//!
//! Purpose
//! -------
//! Estimate the 50% level `α` and slope `β` of one subject's psychometric
//! function from the trials a staircase session produced, together with
//! standard errors and a 95% confidence interval for `α`.
//!
//! Key behaviors
//! -------------
//! - Aggregate the log into `(level, proportion)` points and run the
//!   degeneracy guard ([`stabilize`]).
//! - Start the optimizer at `α0 = median(levels)`, `β0 = FitOptions::initial_slope`
//!   and maximize `-½·SSR` with the bounded L-BFGS run configured in
//!   [`FitOptions::mle_opts`].
//! - On convergence compute `s² (JᵀJ)⁻¹`, the standard errors and the
//!   interval `α ± 1.96·se(α)`.
//! - Every failure path returns a [`FitResult`] with `converged = false`,
//!   NaN estimates and a [`FitFailure`] reason. Nothing here panics or
//!   returns `Err` for a well-formed configuration.
//!
//! Conventions
//! -----------
//! - `n_points` and `stabilized` describe the data actually fitted
//!   (anchors included), even on failure, whenever aggregation got that far.
//! - Fit failures are logged at `debug` through `tracing`.
use crate::{
    optimization::loglik_optimizer::{MLEOptions, maximize},
    psychometric::{
        aggregate::{CurveData, LevelProportion, aggregate, stabilize},
        covariance::covariance,
        errors::{FitFailure, PsychometricError, PsychometricResult},
        model::{LogisticModel, N_PARAMS},
    },
    staircase::core::ResponseLog,
};
use ndarray::{Array1, array};
use tracing::debug;

/// Two-sided 95% normal quantile used for the confidence interval.
pub const Z_95: f64 = 1.96;

/// Default starting slope.
pub const DEFAULT_INITIAL_SLOPE: f64 = 1.0;

/// Fitter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub initial_slope: f64,
    pub mle_opts: MLEOptions,
}

impl FitOptions {
    /// # Errors
    /// - [`PsychometricError::InvalidInitialSlope`] if `initial_slope` is
    ///   zero or non-finite.
    /// - [`PsychometricError::UnboundedIterations`] if `mle_opts` has no
    ///   `max_iter`.
    pub fn new(initial_slope: f64, mle_opts: MLEOptions) -> PsychometricResult<Self> {
        if !initial_slope.is_finite() || initial_slope == 0.0 {
            return Err(PsychometricError::InvalidInitialSlope { value: initial_slope });
        }
        if mle_opts.tols.max_iter.is_none() {
            return Err(PsychometricError::UnboundedIterations);
        }
        Ok(Self { initial_slope, mle_opts })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { initial_slope: DEFAULT_INITIAL_SLOPE, mle_opts: MLEOptions::default() }
    }
}

/// Outcome of a psychometric fit.
///
/// When `converged` is `false` every estimate is NaN and `failure` says why.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub alpha: f64,
    pub beta: f64,
    pub alpha_std_error: f64,
    pub beta_std_error: f64,
    pub confidence_interval_95: (f64, f64),
    pub converged: bool,
    pub failure: Option<FitFailure>,
    pub ssr: f64,
    pub n_points: usize,
    pub iterations: usize,
    pub stabilized: bool,
}

impl FitResult {
    pub fn failed(reason: FitFailure) -> Self {
        Self {
            alpha: f64::NAN,
            beta: f64::NAN,
            alpha_std_error: f64::NAN,
            beta_std_error: f64::NAN,
            confidence_interval_95: (f64::NAN, f64::NAN),
            converged: false,
            failure: Some(reason),
            ssr: f64::NAN,
            n_points: 0,
            iterations: 0,
            stabilized: false,
        }
    }

    fn with_data(mut self, n_points: usize, stabilized: bool) -> Self {
        self.n_points = n_points;
        self.stabilized = stabilized;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PsychometricFitter {
    opts: FitOptions,
}

impl PsychometricFitter {
    pub fn new(opts: FitOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &FitOptions {
        &self.opts
    }

    /// Fit one subject's trial log.
    pub fn fit(&self, log: &ResponseLog) -> FitResult {
        if log.is_empty() {
            return log_failure(FitResult::failed(FitFailure::EmptyLog));
        }
        self.fit_points(&aggregate(log))
    }

    /// Fit already-aggregated points (for example a historical table row).
    /// The degeneracy guard is applied here as well.
    pub fn fit_points(&self, points: &[LevelProportion]) -> FitResult {
        if points.is_empty() {
            return log_failure(FitResult::failed(FitFailure::EmptyLog));
        }
        let distinct = distinct_levels(points);
        if distinct < 2 {
            return log_failure(FitResult::failed(FitFailure::InsufficientLevels { distinct }));
        }

        let (fit_points, stabilized) = match stabilize(points) {
            Some(augmented) => (augmented, true),
            None => (points.to_vec(), false),
        };
        let data = CurveData::from_points(&fit_points);
        let n = data.len();
        if n <= N_PARAMS {
            return log_failure(
                FitResult::failed(FitFailure::InsufficientDegreesOfFreedom { points: n })
                    .with_data(n, stabilized),
            );
        }

        match self.estimate(&data) {
            Ok(result) => result.with_data(n, stabilized),
            Err(reason) => log_failure(FitResult::failed(reason).with_data(n, stabilized)),
        }
    }

    fn estimate(&self, data: &CurveData) -> Result<FitResult, FitFailure> {
        let model = LogisticModel;
        let theta0 = array![median(&data.x), self.opts.initial_slope];
        let outcome = maximize(&model, theta0, data, &self.opts.mle_opts)?;
        if !outcome.converged {
            return Err(FitFailure::NotConverged {
                status: outcome.status,
                iterations: outcome.iterations,
            });
        }

        let theta_hat = outcome.theta_hat;
        let cov = covariance(&model, &theta_hat, data)?;
        let se = cov.std_errors();
        let (alpha, beta) = (theta_hat[0], theta_hat[1]);
        Ok(FitResult {
            alpha,
            beta,
            alpha_std_error: se[0],
            beta_std_error: se[1],
            confidence_interval_95: (alpha - Z_95 * se[0], alpha + Z_95 * se[0]),
            converged: true,
            failure: None,
            ssr: model.ssr(&theta_hat, data),
            n_points: 0,
            iterations: outcome.iterations,
            stabilized: false,
        })
    }
}

fn log_failure(result: FitResult) -> FitResult {
    if let Some(reason) = &result.failure {
        debug!(
            reason = %reason,
            n_points = result.n_points,
            stabilized = result.stabilized,
            "psychometric fit failed"
        );
    }
    result
}

fn distinct_levels(points: &[LevelProportion]) -> usize {
    let mut levels: Vec<f64> = points.iter().map(|p| p.level).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    levels.len()
}

fn median(x: &Array1<f64>) -> f64 {
    let mut sorted = x.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 { 0.5 * (sorted[mid - 1] + sorted[mid]) } else { sorted[mid] }
}
