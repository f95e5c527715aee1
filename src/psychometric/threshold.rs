//! ThresholdReporter — stimulus levels at target response probabilities.
//!
//! Inverts the fitted logistic: `x = α + ln(p / (1 - p)) / β`. A flat curve
//! (`β = 0`) or a probability outside `(0, 1)` marks that entry unavailable
//! without affecting the others. A non-converged fit yields an empty table.
use crate::{
    optimization::numerical_stability::logit,
    psychometric::{errors::ThresholdUnavailable, fitter::FitResult},
};

/// Level at which the fitted curve reaches `probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEntry {
    pub probability: f64,
    pub level: Result<f64, ThresholdUnavailable>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdTable {
    entries: Vec<ThresholdEntry>,
}

impl ThresholdTable {
    pub fn entries(&self) -> &[ThresholdEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Level for the entry whose probability equals `p` exactly.
    pub fn level_at(&self, p: f64) -> Option<Result<f64, ThresholdUnavailable>> {
        self.entries.iter().find(|e| e.probability == p).map(|e| e.level)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThresholdEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ThresholdTable {
    type Item = &'a ThresholdEntry;
    type IntoIter = std::slice::Iter<'a, ThresholdEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdReporter;

impl ThresholdReporter {
    /// One entry per target, in input order; empty when `fit` did not
    /// converge.
    pub fn report(fit: &FitResult, targets: &[f64]) -> ThresholdTable {
        if !fit.converged {
            return ThresholdTable::default();
        }
        let entries = targets
            .iter()
            .map(|&p| ThresholdEntry {
                probability: p,
                level: threshold_level(fit.alpha, fit.beta, p),
            })
            .collect();
        ThresholdTable { entries }
    }
}

/// Invert `f(x; α, β) = p` for `x`.
pub fn threshold_level(alpha: f64, beta: f64, p: f64) -> Result<f64, ThresholdUnavailable> {
    if !(p > 0.0 && p < 1.0) {
        return Err(ThresholdUnavailable::ProbabilityOutOfRange { p });
    }
    if beta == 0.0 {
        return Err(ThresholdUnavailable::ZeroSlope);
    }
    let level = alpha + logit(p) / beta;
    if level.is_finite() { Ok(level) } else { Err(ThresholdUnavailable::NonFinite) }
}
