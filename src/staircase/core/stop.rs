//! Stop predicate of a staircase session.
//!
//! A session ends as a whole when any enabled clause fires; individual
//! staircases are never retired. Three clauses can be combined freely:
//!
//! - `max_trials`: `trial_count >= max_trials`;
//! - total inversions: `Σ inversions >= max_total AND trial_count >= min_trials`;
//! - per-staircase inversions: every staircase has at least
//!   `max_per_staircase` inversions.
//!
//! Clauses are checked in that order and the first one that holds is
//! reported as the [`StopReason`].
use crate::staircase::{
    core::staircase::Staircase,
    errors::{StaircaseError, StaircaseResult},
};

/// Sum-of-inversions clause with its minimum-trial guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalInversions {
    pub max_total: u32,
    pub min_trials: u32,
}

/// Enabled subset of the three stop clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopRules {
    max_trials: Option<u32>,
    total_inversions: Option<TotalInversions>,
    per_staircase_inversions: Option<u32>,
}

impl StopRules {
    /// Construct validated stop rules.
    ///
    /// # Errors
    /// - [`StaircaseError::NoStopRule`] when every clause is `None`.
    /// - [`StaircaseError::InvalidStopRule`] for a zero threshold, including
    ///   a zero `min_trials` guard.
    pub fn new(
        max_trials: Option<u32>, total_inversions: Option<TotalInversions>,
        per_staircase_inversions: Option<u32>,
    ) -> StaircaseResult<Self> {
        if max_trials.is_none() && total_inversions.is_none() && per_staircase_inversions.is_none()
        {
            return Err(StaircaseError::NoStopRule);
        }
        positive("max_trials", max_trials)?;
        if let Some(total) = total_inversions {
            positive("max_total_inversions", Some(total.max_total))?;
            positive("min_trials", Some(total.min_trials))?;
        }
        positive("max_inversions_per_staircase", per_staircase_inversions)?;
        Ok(Self { max_trials, total_inversions, per_staircase_inversions })
    }

    /// Only the trial-count clause.
    pub fn max_trials_only(max_trials: u32) -> StaircaseResult<Self> {
        Self::new(Some(max_trials), None, None)
    }

    pub fn max_trials(&self) -> Option<u32> {
        self.max_trials
    }

    pub fn total_inversions(&self) -> Option<TotalInversions> {
        self.total_inversions
    }

    pub fn per_staircase_inversions(&self) -> Option<u32> {
        self.per_staircase_inversions
    }

    /// Evaluate the predicate after `trial_count` recorded trials.
    pub fn evaluate(&self, trial_count: u32, staircases: &[Staircase]) -> Option<StopReason> {
        if let Some(max) = self.max_trials {
            if trial_count >= max {
                return Some(StopReason::MaxTrials { trials: trial_count });
            }
        }
        if let Some(TotalInversions { max_total, min_trials }) = self.total_inversions {
            let total: u32 = staircases.iter().map(Staircase::inversion_count).sum();
            if total >= max_total && trial_count >= min_trials {
                return Some(StopReason::TotalInversions { total, trials: trial_count });
            }
        }
        if let Some(max_each) = self.per_staircase_inversions {
            let fewest = staircases.iter().map(Staircase::inversion_count).min();
            if let Some(fewest) = fewest.filter(|&n| n >= max_each) {
                return Some(StopReason::PerStaircaseInversions { fewest });
            }
        }
        None
    }
}

impl Default for StopRules {
    /// Reference experiment: 50 trials, or 15 total inversions after at
    /// least 20 trials.
    fn default() -> Self {
        Self {
            max_trials: Some(50),
            total_inversions: Some(TotalInversions { max_total: 15, min_trials: 20 }),
            per_staircase_inversions: None,
        }
    }
}

fn positive(name: &'static str, value: Option<u32>) -> StaircaseResult<()> {
    match value {
        Some(0) => Err(StaircaseError::InvalidStopRule {
            name,
            value: 0,
            reason: "Stop thresholds must be greater than zero.",
        }),
        _ => Ok(()),
    }
}

/// Which clause ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxTrials { trials: u32 },
    TotalInversions { total: u32, trials: u32 },
    PerStaircaseInversions { fewest: u32 },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::MaxTrials { trials } => write!(f, "maximum trials reached ({trials})"),
            StopReason::TotalInversions { total, trials } => {
                write!(f, "total inversions reached ({total} after {trials} trials)")
            }
            StopReason::PerStaircaseInversions { fewest } => {
                write!(f, "every staircase reached {fewest} inversions")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staircase::core::config::{Direction, LevelBounds};

    fn staircases_with(inversions: &[u32]) -> Vec<Staircase> {
        let bounds = LevelBounds::default();
        inversions
            .iter()
            .enumerate()
            .map(|(id, &n)| {
                let mut s = Staircase::new(id, Direction::Ascending, &bounds, 5, 1);
                s.set_inversion_count_for_test(n);
                s
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // Ensure an empty rule set and zero thresholds are rejected.
    //
    // Given
    // -----
    // - No clauses; `max_trials = 0`; `min_trials = 0`.
    //
    // Expect
    // ------
    // - `NoStopRule` and `InvalidStopRule` respectively.
    fn stop_rules_reject_empty_and_zero_thresholds() {
        assert_eq!(StopRules::new(None, None, None), Err(StaircaseError::NoStopRule));
        assert!(matches!(
            StopRules::new(Some(0), None, None),
            Err(StaircaseError::InvalidStopRule { name: "max_trials", .. })
        ));
        let total = TotalInversions { max_total: 5, min_trials: 0 };
        assert!(matches!(
            StopRules::new(None, Some(total), None),
            Err(StaircaseError::InvalidStopRule { name: "min_trials", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify the total-inversion clause honors its minimum-trial guard.
    //
    // Given
    // -----
    // - max_total 4, min_trials 10; inversions (3, 2).
    //
    // Expect
    // ------
    // - No stop at trial 9; stop at trial 10 with total 5.
    fn total_inversions_wait_for_min_trials() {
        let total = TotalInversions { max_total: 4, min_trials: 10 };
        let rules = StopRules::new(None, Some(total), None).expect("valid rules");
        let stairs = staircases_with(&[3, 2]);

        assert_eq!(rules.evaluate(9, &stairs), None);
        assert_eq!(
            rules.evaluate(10, &stairs),
            Some(StopReason::TotalInversions { total: 5, trials: 10 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Check the per-staircase clause requires *every* staircase to qualify.
    //
    // Given
    // -----
    // - Threshold 3; inversions (5, 2) then (5, 3).
    //
    // Expect
    // ------
    // - No stop for (5, 2); stop with fewest = 3 for (5, 3).
    fn per_staircase_clause_needs_all_staircases() {
        let rules = StopRules::new(None, None, Some(3)).expect("valid rules");

        assert_eq!(rules.evaluate(40, &staircases_with(&[5, 2])), None);
        assert_eq!(
            rules.evaluate(40, &staircases_with(&[5, 3])),
            Some(StopReason::PerStaircaseInversions { fewest: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure the trial cap takes precedence when several clauses hold.
    //
    // Given
    // -----
    // - Default rules at trial 50 with 20 total inversions.
    //
    // Expect
    // ------
    // - `MaxTrials { trials: 50 }`.
    fn max_trials_is_reported_first() {
        let rules = StopRules::default();

        assert_eq!(
            rules.evaluate(50, &staircases_with(&[10, 10])),
            Some(StopReason::MaxTrials { trials: 50 })
        );
    }
}
