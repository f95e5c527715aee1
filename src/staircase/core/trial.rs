//! Trial records and the append-only response log.
use crate::staircase::{
    core::{config::Direction, staircase::Response},
    errors::{StaircaseError, StaircaseResult},
};

/// One recorded trial. Immutable once appended to a [`ResponseLog`].
///
/// `level_presented` is the level actually shown, which may differ from the
/// staircase's tracked level when dithering is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub trial_index: u32,
    pub staircase_id: usize,
    pub direction: Direction,
    pub level_presented: i64,
    pub response: Response,
}

/// Ordered trial record of one session.
///
/// Trial indices are 1-based and strictly increasing; the log only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseLog {
    trials: Vec<Trial>,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from stored trials (e.g. a CSV written by an earlier
    /// session).
    ///
    /// # Errors
    /// [`StaircaseError::NonMonotonicTrialIndex`] when indices are not
    /// strictly increasing from at least 1.
    pub fn from_trials(trials: Vec<Trial>) -> StaircaseResult<Self> {
        let mut log = Self::new();
        for trial in trials {
            log.push(trial)?;
        }
        Ok(log)
    }

    pub(crate) fn push(&mut self, trial: Trial) -> StaircaseResult<()> {
        let previous = self.trials.last().map_or(0, |t| t.trial_index);
        if trial.trial_index <= previous {
            return Err(StaircaseError::NonMonotonicTrialIndex {
                index: trial.trial_index,
                previous,
            });
        }
        self.trials.push(trial);
        Ok(())
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn last(&self) -> Option<&Trial> {
        self.trials.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trial> {
        self.trials.iter()
    }

    /// Trials belonging to one staircase, in order.
    pub fn for_staircase(&self, staircase_id: usize) -> impl Iterator<Item = &Trial> {
        self.trials.iter().filter(move |t| t.staircase_id == staircase_id)
    }
}

impl<'a> IntoIterator for &'a ResponseLog {
    type Item = &'a Trial;
    type IntoIter = std::slice::Iter<'a, Trial>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(index: u32, id: usize, level: i64, code: i64) -> Trial {
        Trial {
            trial_index: index,
            staircase_id: id,
            direction: if id == 0 { Direction::Ascending } else { Direction::Descending },
            level_presented: level,
            response: Response::from_code(code).expect("valid code"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure the log rejects indices that do not strictly increase.
    //
    // Given
    // -----
    // - Trials indexed 1, 2, 2 and a trial indexed 0.
    //
    // Expect
    // ------
    // - `NonMonotonicTrialIndex` for the repeated index and for 0.
    fn log_rejects_non_increasing_indices() {
        let err = ResponseLog::from_trials(vec![trial(1, 0, 17, 0), trial(2, 1, 50, 1), trial(2, 0, 22, 0)]);
        assert_eq!(err, Err(StaircaseError::NonMonotonicTrialIndex { index: 2, previous: 2 }));
        assert!(ResponseLog::from_trials(vec![trial(0, 0, 17, 0)]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Check per-staircase filtering preserves order.
    //
    // Given
    // -----
    // - Four alternating trials.
    //
    // Expect
    // ------
    // - Staircase 1 yields indices 2 and 4.
    fn for_staircase_filters_in_order() {
        let log = ResponseLog::from_trials(vec![
            trial(1, 0, 17, 0),
            trial(2, 1, 50, 1),
            trial(3, 0, 22, 0),
            trial(4, 1, 45, 1),
        ])
        .expect("valid log");

        let indices: Vec<u32> = log.for_staircase(1).map(|t| t.trial_index).collect();
        assert_eq!(indices, vec![2, 4]);
        assert_eq!(log.len(), 4);
    }
}
