//! Conversion helpers for the PyO3 surface in `lib.rs`.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! turns Python arguments into validated Rust configuration, mapping every
//! rejection to a `ValueError` or `TypeError`.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
    staircase::core::{
        DitherOptions, HalvingMode, LevelBounds, Response, ResponseLog, SessionConfig,
        StepPolicy, StopRules, TotalInversions, Trial,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Accept a contiguous `float64` ndarray, anything with `to_numpy()`, or a
/// plain sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Keyword arguments of `StaircaseSession(...)`, grouped before validation.
#[cfg(feature = "python-bindings")]
pub struct SessionArgs {
    pub min_level: i64,
    pub max_level: i64,
    pub initial_step: i64,
    pub min_step: i64,
    pub max_trials: Option<u32>,
    pub max_total_inversions: Option<u32>,
    pub min_trials: u32,
    pub max_inversions_per_staircase: Option<u32>,
    pub target_inversions: Option<u32>,
    pub p_dither: f64,
    pub anti_repeat: bool,
    pub target_probabilities: Option<Vec<f64>>,
    pub seed: u64,
}

#[cfg(feature = "python-bindings")]
pub fn build_session_config(args: SessionArgs) -> PyResult<SessionConfig> {
    let bounds = LevelBounds::new(args.min_level, args.max_level)?;
    let step_policy = match args.target_inversions {
        Some(target) => StepPolicy::halve_after(target, HalvingMode::EveryInversion)?,
        None => StepPolicy::Decrement,
    };
    let total = args
        .max_total_inversions
        .map(|max_total| TotalInversions { max_total, min_trials: args.min_trials });
    let stop_rules = StopRules::new(args.max_trials, total, args.max_inversions_per_staircase)?;
    let dither = DitherOptions::new(args.p_dither, args.anti_repeat)?;
    let defaults = SessionConfig::default();

    Ok(SessionConfig::new(
        bounds,
        args.initial_step,
        args.min_step,
        step_policy,
        stop_rules,
        dither,
        defaults.directions,
        args.target_probabilities.unwrap_or(defaults.target_probabilities),
        args.seed,
    )?)
}

/// Optimizer options from Python keywords. A missing `max_iter` keeps the
/// default budget so every fit stays bounded.
#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    let defaults = Tolerances::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter.or(defaults.max_iter))?
    };
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => LineSearcher::MoreThuente,
    };
    Ok(MLEOptions::new(tols, ls, false, lbfgs_mem)?)
}

/// Rebuild a log from parallel `levels` / `responses` arrays. Trials are
/// numbered from 1 and alternate between the default staircases.
#[cfg(feature = "python-bindings")]
pub fn build_response_log(levels: &[f64], responses: &[i64]) -> PyResult<ResponseLog> {
    if levels.len() != responses.len() {
        return Err(PyValueError::new_err(format!(
            "levels and responses differ in length ({} vs {})",
            levels.len(),
            responses.len()
        )));
    }
    let directions = SessionConfig::default().directions;
    let mut trials = Vec::with_capacity(levels.len());
    for (i, (&level, &code)) in levels.iter().zip(responses).enumerate() {
        if !level.is_finite() || level.fract() != 0.0 {
            return Err(PyValueError::new_err(format!(
                "level {level} at position {i} is not an integer"
            )));
        }
        let staircase_id = i % directions.len();
        trials.push(Trial {
            trial_index: i as u32 + 1,
            staircase_id,
            direction: directions[staircase_id],
            level_presented: level as i64,
            response: Response::from_code(code)?,
        });
    }
    Ok(ResponseLog::from_trials(trials)?)
}
