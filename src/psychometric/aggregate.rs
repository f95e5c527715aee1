//! Aggregation of trial logs into per-level proportions, and the
//! degeneracy guard applied before fitting.
//!
//! Purpose
//! -------
//! Turn one subject's trials into the `(level, proportion)` points the
//! logistic model is fitted to, and augment nearly-degenerate data so the
//! fit has a chance to converge.
//!
//! Key behaviors
//! -------------
//! - [`aggregate`] groups trials by presented level; the proportion is the
//!   mean response (share of "too large") and points come out sorted by
//!   level.
//! - [`stabilize`] fires when fewer than [`MIN_DISTINCT_PROPORTIONS`]
//!   distinct proportion values exist. It takes the lowest level whose
//!   proportion is strictly inside `(0, 1)` and appends two synthetic anchors
//!   at `level ± 1` with proportions `p ∓ ANCHOR_OFFSET`, clipped to
//!   `[0, 1]`. Observed points are never replaced. Without such a level the
//!   data are returned unchanged.
//!
//! Conventions
//! -----------
//! - Synthetic anchors carry `n_trials = 0`.
//! - Levels are `f64` from here on; anchors need not coincide with a
//!   presentable integer level in general, and the model works in reals.
use crate::staircase::core::ResponseLog;
use ndarray::Array1;
use std::collections::BTreeMap;

/// Below this many distinct proportion values the data are stabilized.
pub const MIN_DISTINCT_PROPORTIONS: usize = 3;

/// Proportion offset of the synthetic anchors.
pub const ANCHOR_OFFSET: f64 = 0.05;

/// Empirical proportion of "too large" responses at one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProportion {
    pub level: f64,
    pub proportion: f64,
    pub n_trials: usize,
}

impl LevelProportion {
    pub fn is_anchor(&self) -> bool {
        self.n_trials == 0
    }
}

/// Group a trial log by presented level, sorted ascending.
pub fn aggregate(log: &ResponseLog) -> Vec<LevelProportion> {
    let mut by_level: BTreeMap<i64, (u64, usize)> = BTreeMap::new();
    for trial in log {
        let entry = by_level.entry(trial.level_presented).or_insert((0, 0));
        entry.0 += u64::from(trial.response.code());
        entry.1 += 1;
    }
    by_level
        .into_iter()
        .map(|(level, (ones, n))| LevelProportion {
            level: level as f64,
            proportion: ones as f64 / n as f64,
            n_trials: n,
        })
        .collect()
}

/// Number of distinct proportion values among `points`.
pub fn distinct_proportions(points: &[LevelProportion]) -> usize {
    let mut values: Vec<f64> = points.iter().map(|p| p.proportion).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.len()
}

/// Apply the degeneracy guard.
///
/// Returns `Some(augmented)` when anchors were added, `None` when the data
/// already have enough distinct proportions or no intermediate level exists.
pub fn stabilize(points: &[LevelProportion]) -> Option<Vec<LevelProportion>> {
    if distinct_proportions(points) >= MIN_DISTINCT_PROPORTIONS {
        return None;
    }
    let pivot = points
        .iter()
        .filter(|p| p.proportion > 0.0 && p.proportion < 1.0)
        .min_by(|a, b| a.level.total_cmp(&b.level))?;
    let mut augmented = points.to_vec();
    augmented.push(LevelProportion {
        level: pivot.level - 1.0,
        proportion: (pivot.proportion - ANCHOR_OFFSET).clamp(0.0, 1.0),
        n_trials: 0,
    });
    augmented.push(LevelProportion {
        level: pivot.level + 1.0,
        proportion: (pivot.proportion + ANCHOR_OFFSET).clamp(0.0, 1.0),
        n_trials: 0,
    });
    // Stable sort keeps an observed point ahead of an anchor at the same level.
    augmented.sort_by(|a, b| a.level.total_cmp(&b.level));
    Some(augmented)
}

/// Fit-ready arrays `x` (levels) and `y` (proportions).
#[derive(Debug, Clone, PartialEq)]
pub struct CurveData {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

impl CurveData {
    pub fn from_points(points: &[LevelProportion]) -> Self {
        Self {
            x: points.iter().map(|p| p.level).collect(),
            y: points.iter().map(|p| p.proportion).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
