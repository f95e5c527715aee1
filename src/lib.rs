//! rust_psychophysics — adaptive staircases and psychometric fitting with
//! optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes staircase sessions and psychometric fitting to Python via the
//! `_rust_psychophysics` extension module. When the `python-bindings`
//! feature is enabled, this module defines the Python-facing classes and
//! submodules used by the `rust_psychophysics` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules as the public crate surface:
//!   [`staircase`] (data collection), [`psychometric`] (fitting and
//!   thresholds), [`optimization`] (L-BFGS backend), [`persistence`] (CSV
//!   storage) and [`report`] (the bundle handed to rendering).
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer and
//!   register the `staircase` and `psychometric` Python submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All domain logic lives in the inner modules; this file performs only FFI
//!   glue, input conversion, and error mapping.
//! - Every core error type converts into a Python `ValueError` at the
//!   boundary.
//!
//! Conventions
//! -----------
//! - Response codes: 1 = "too large", 0 = "too small".
//! - Staircase ids are 0-based, trial indices 1-based.
//!
//! Testing notes
//! -------------
//! - Numerical and state-machine behavior is covered by unit tests in the
//!   inner modules and by `tests/integration_session_pipeline.rs`.

pub mod optimization;
pub mod persistence;
pub mod psychometric;
pub mod report;
pub mod staircase;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use crate::{
    psychometric::{
        fitter::{FitOptions, FitResult, PsychometricFitter},
        threshold::{ThresholdReporter, ThresholdTable},
    },
    staircase::session::Session,
    utils::{
        SessionArgs, build_response_log, build_session_config, extract_f64_array, extract_mle_opts,
    },
};

/// StaircaseSession — Python-facing wrapper for a running [`Session`].
///
/// Constructed from Python via
/// `StaircaseSession(subject, min_level=17, max_level=50, initial_step=5, ...)`.
/// The defaults reproduce the reference two-staircase experiment: one
/// ascending and one descending staircase, decrement step policy, stop after
/// 50 trials or 15 total inversions once 20 trials have run.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_psychophysics.staircase")]
pub struct StaircaseSession {
    inner: Session,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StaircaseSession {
    #[new]
    #[pyo3(
        signature = (
            subject,
            min_level = 17,
            max_level = 50,
            initial_step = 5,
            min_step = 1,
            max_trials = Some(50),
            max_total_inversions = Some(15),
            min_trials = 20,
            max_inversions_per_staircase = None,
            target_inversions = None,
            p_dither = 0.0,
            anti_repeat = false,
            target_probabilities = None,
            seed = 0,
        ),
        text_signature = "(subject, /, min_level=17, max_level=50, initial_step=5, min_step=1, \
                          max_trials=50, max_total_inversions=15, min_trials=20, \
                          max_inversions_per_staircase=None, target_inversions=None, \
                          p_dither=0.0, anti_repeat=False, target_probabilities=None, seed=0)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject: String, min_level: i64, max_level: i64, initial_step: i64, min_step: i64,
        max_trials: Option<u32>, max_total_inversions: Option<u32>, min_trials: u32,
        max_inversions_per_staircase: Option<u32>, target_inversions: Option<u32>, p_dither: f64,
        anti_repeat: bool, target_probabilities: Option<Vec<f64>>, seed: u64,
    ) -> PyResult<Self> {
        let config = build_session_config(SessionArgs {
            min_level,
            max_level,
            initial_step,
            min_step,
            max_trials,
            max_total_inversions,
            min_trials,
            max_inversions_per_staircase,
            target_inversions,
            p_dither,
            anti_repeat,
            target_probabilities,
            seed,
        })?;
        Ok(Self { inner: Session::new(subject, config)? })
    }

    /// Level to present next; raises once the session has stopped.
    pub fn next_level(&mut self) -> PyResult<i64> {
        Ok(self.inner.next_trial()?.level_presented)
    }

    /// `(trial_index, staircase_id, level)` of the pending trial.
    pub fn next_trial(&mut self) -> PyResult<(u32, usize, i64)> {
        let pending = self.inner.next_trial()?;
        Ok((pending.trial_index, pending.staircase_id, pending.level_presented))
    }

    /// Record 1 ("too large") or 0 ("too small") for the pending trial and
    /// return its trial index.
    pub fn record_response(&mut self, response: u8) -> PyResult<u32> {
        Ok(self.inner.record_response(response)?.trial_index)
    }

    #[getter]
    pub fn finished(&self) -> bool {
        self.inner.is_finished()
    }

    #[getter]
    pub fn subject(&self) -> String {
        self.inner.subject_id().to_string()
    }

    /// `(trial, staircase, direction, level, response)` rows in log order.
    pub fn trials(&self) -> Vec<(u32, usize, &'static str, i64, u8)> {
        self.inner
            .log()
            .iter()
            .map(|t| {
                (
                    t.trial_index,
                    t.staircase_id,
                    t.direction.as_str(),
                    t.level_presented,
                    t.response.code(),
                )
            })
            .collect()
    }

    /// Current tracked level of every staircase, in id order.
    pub fn levels(&self) -> Vec<i64> {
        self.inner.staircases().iter().map(|s| s.current_level()).collect()
    }

    pub fn summary(&self) -> String {
        self.inner.summary().to_string()
    }
}

/// PsychometricFit — Python-facing view of a [`FitResult`] and its
/// threshold table.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_psychophysics.psychometric")]
pub struct PsychometricFit {
    fit: FitResult,
    thresholds: ThresholdTable,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PsychometricFit {
    #[getter]
    pub fn alpha(&self) -> f64 {
        self.fit.alpha
    }

    #[getter]
    pub fn beta(&self) -> f64 {
        self.fit.beta
    }

    #[getter]
    pub fn alpha_std_error(&self) -> f64 {
        self.fit.alpha_std_error
    }

    #[getter]
    pub fn beta_std_error(&self) -> f64 {
        self.fit.beta_std_error
    }

    #[getter]
    pub fn confidence_interval(&self) -> (f64, f64) {
        self.fit.confidence_interval_95
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.fit.converged
    }

    /// Failure reason of a non-converged fit, `None` otherwise.
    #[getter]
    pub fn failure(&self) -> Option<String> {
        self.fit.failure.as_ref().map(ToString::to_string)
    }

    /// `(probability, level)` pairs; `level` is `None` where unavailable.
    #[getter]
    pub fn thresholds(&self) -> Vec<(f64, Option<f64>)> {
        self.thresholds.iter().map(|e| (e.probability, e.level.ok())).collect()
    }
}

/// Fit a logistic psychometric function to parallel `levels` / `responses`
/// arrays and report thresholds at `targets`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        levels,
        responses,
        targets = None,
        initial_slope = 1.0,
        tol_grad = None,
        tol_cost = None,
        max_iter = None,
        line_searcher = None,
        lbfgs_mem = None,
    ),
    text_signature = "(levels, responses, /, targets=None, initial_slope=1.0, tol_grad=None, \
                      tol_cost=None, max_iter=None, line_searcher=None, lbfgs_mem=None)"
)]
#[allow(clippy::too_many_arguments)]
pub fn fit_psychometric<'py>(
    py: Python<'py>, levels: &Bound<'py, PyAny>, responses: Vec<i64>, targets: Option<Vec<f64>>,
    initial_slope: f64, tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<PsychometricFit> {
    let arr: PyReadonlyArray1<f64> = extract_f64_array(py, levels)?;
    let levels = arr.as_slice().map_err(|e| PyValueError::new_err(e.to_string()))?;
    let log = build_response_log(levels, &responses)?;

    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
    let opts = FitOptions::new(initial_slope, mle_opts)?;
    let fit = PsychometricFitter::new(opts).fit(&log);
    let targets = targets.unwrap_or_else(|| vec![0.5, 0.7, 0.8]);
    let thresholds = ThresholdReporter::report(&fit, &targets);
    Ok(PsychometricFit { fit, thresholds })
}

/// _rust_psychophysics — PyO3 module initializer for the Python extension.
///
/// Creates the `staircase` and `psychometric` submodules, attaches them to
/// the parent module and registers them in `sys.modules` so dotted imports
/// work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_psychophysics<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let staircase_mod = PyModule::new(_py, "staircase")?;
    let psychometric_mod = PyModule::new(_py, "psychometric")?;
    staircase_module(_py, m, &staircase_mod)?;
    psychometric_module(_py, m, &psychometric_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_psychophysics.staircase", staircase_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_psychophysics.psychometric", psychometric_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn staircase_module<'py>(
    _py: Python, rust_psychophysics: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<StaircaseSession>()?;
    rust_psychophysics.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn psychometric_module<'py>(
    _py: Python, rust_psychophysics: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PsychometricFit>()?;
    m.add_function(wrap_pyfunction!(fit_psychometric, m)?)?;
    rust_psychophysics.add_submodule(m)?;
    Ok(())
}
