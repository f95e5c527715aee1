//! Session report — the bundle handed to rendering and persistence.
//!
//! Purpose
//! -------
//! Collect everything a finished session produces for downstream
//! consumers in one value: the empirical proportions, the fit, the
//! thresholds, and (only for a converged fit) a sampled curve over the
//! configured level range.
//!
//! Key behaviors
//! -------------
//! - [`SessionReport::build`] runs the fitter and threshold reporter on a
//!   trial log.
//! - `curve` holds [`CURVE_SAMPLES`] evenly spaced points across
//!   `[min, max]` of the level bounds when the fit converged, else `None`.
//! - `Display` prints a short human-readable summary with two decimals.
//!
//! Conventions
//! -----------
//! - Proportions in the report are the observed ones; synthetic anchors used
//!   by the fitter never appear here.
use crate::{
    psychometric::{
        aggregate::{LevelProportion, aggregate},
        errors::{PsychometricError, PsychometricResult},
        fitter::{FitOptions, FitResult, PsychometricFitter},
        model::logistic,
        threshold::{ThresholdReporter, ThresholdTable},
    },
    staircase::core::{LevelBounds, ResponseLog},
};
use std::fmt;

/// Number of points in a sampled curve.
pub const CURVE_SAMPLES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub level: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub proportions: Vec<LevelProportion>,
    pub fit: FitResult,
    pub thresholds: ThresholdTable,
    pub curve: Option<Vec<CurvePoint>>,
}

impl SessionReport {
    /// Fit `log` and assemble the report.
    ///
    /// # Errors
    /// Only curve sampling can fail, and only for a grid that
    /// [`LevelBounds`] already rules out; fit failures are carried inside
    /// [`FitResult`].
    pub fn build(
        log: &ResponseLog, opts: &FitOptions, targets: &[f64], bounds: &LevelBounds,
    ) -> PsychometricResult<Self> {
        let proportions = aggregate(log);
        let fit = PsychometricFitter::new(opts.clone()).fit(log);
        let thresholds = ThresholdReporter::report(&fit, targets);
        let curve = if fit.converged {
            Some(sample_curve(
                fit.alpha,
                fit.beta,
                bounds.min() as f64,
                bounds.max() as f64,
                CURVE_SAMPLES,
            )?)
        } else {
            None
        };
        Ok(Self { proportions, fit, thresholds, curve })
    }
}

/// `points` evenly spaced samples of `f(x; α, β)` over `[min, max]`, both
/// ends included.
///
/// # Errors
/// [`PsychometricError::InvalidCurveGrid`] for fewer than two points or a
/// range that is not finite and increasing.
pub fn sample_curve(
    alpha: f64, beta: f64, min: f64, max: f64, points: usize,
) -> PsychometricResult<Vec<CurvePoint>> {
    if points < 2 {
        return Err(PsychometricError::InvalidCurveGrid {
            points,
            reason: "A curve needs at least two samples.",
        });
    }
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(PsychometricError::InvalidCurveGrid {
            points,
            reason: "Range must be finite with min < max.",
        });
    }
    let step = (max - min) / (points - 1) as f64;
    Ok((0..points)
        .map(|i| {
            let level = if i == points - 1 { max } else { min + step * i as f64 };
            CurvePoint { level, probability: logistic(level, alpha, beta) }
        })
        .collect())
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fit = &self.fit;
        if fit.converged {
            let (lo, hi) = fit.confidence_interval_95;
            writeln!(
                f,
                "alpha = {:.2} (se {:.2}, 95% CI [{:.2}, {:.2}])",
                fit.alpha, fit.alpha_std_error, lo, hi
            )?;
            writeln!(f, "beta = {:.2} (se {:.2})", fit.beta, fit.beta_std_error)?;
            for entry in &self.thresholds {
                match entry.level {
                    Ok(level) => writeln!(f, "threshold p={:.2}: {:.2}", entry.probability, level)?,
                    Err(why) => {
                        writeln!(f, "threshold p={:.2}: unavailable ({why})", entry.probability)?
                    }
                }
            }
        } else {
            match &fit.failure {
                Some(reason) => writeln!(f, "fit did not converge: {reason}")?,
                None => writeln!(f, "fit did not converge")?,
            }
        }
        writeln!(f, "empirical proportions:")?;
        for p in &self.proportions {
            writeln!(f, "  level {:.0}: {:.2} (n={})", p.level, p.proportion, p.n_trials)?;
        }
        Ok(())
    }
}
