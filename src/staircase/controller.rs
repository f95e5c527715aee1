//! StaircaseController — owns the staircase set and applies the update rule.
//!
//! Purpose
//! -------
//! Keep the fixed set of staircases, apply each response through the
//! configured step policy, append the corresponding [`Trial`] to the
//! [`ResponseLog`], and evaluate the stop predicate.
//!
//! Key behaviors
//! -------------
//! - [`StaircaseController::next_level`] is a pure read of a staircase's
//!   tracked level.
//! - [`StaircaseController::record_presented`] validates the staircase id
//!   before touching any state, appends the trial with the level that was
//!   actually shown, then updates the staircase.
//! - [`StaircaseController::stop_reason`] evaluates the enabled stop clauses
//!   against the current trial count and inversion counts.
//!
//! Invariants & assumptions
//! ------------------------
//! - The staircase set is created once and never shrinks or grows.
//! - Exactly one trial is appended per recorded response.
//! - The controller does not know about scheduling, dithering or session
//!   freezing; the session enforces those.
use crate::staircase::{
    core::{
        LevelBounds, Response, ResponseLog, SessionConfig, Staircase, StepPolicy, StopReason,
        StopRules, Trial,
    },
    errors::{StaircaseError, StaircaseResult},
};

#[derive(Debug, Clone, PartialEq)]
pub struct StaircaseController {
    staircases: Vec<Staircase>,
    bounds: LevelBounds,
    step_policy: StepPolicy,
    stop_rules: StopRules,
    log: ResponseLog,
}

impl StaircaseController {
    /// Build one staircase per configured direction.
    ///
    /// # Errors
    /// Propagates [`SessionConfig::validate`] failures.
    pub fn new(config: &SessionConfig) -> StaircaseResult<Self> {
        config.validate()?;
        let staircases = config
            .directions
            .iter()
            .enumerate()
            .map(|(id, &direction)| {
                Staircase::new(id, direction, &config.bounds, config.initial_step, config.min_step)
            })
            .collect();
        Ok(Self {
            staircases,
            bounds: config.bounds,
            step_policy: config.step_policy,
            stop_rules: config.stop_rules,
            log: ResponseLog::new(),
        })
    }

    pub fn staircases(&self) -> &[Staircase] {
        &self.staircases
    }

    pub fn bounds(&self) -> &LevelBounds {
        &self.bounds
    }

    pub fn log(&self) -> &ResponseLog {
        &self.log
    }

    /// # Errors
    /// [`StaircaseError::UnknownStaircase`] for an id outside the set.
    pub fn staircase(&self, staircase_id: usize) -> StaircaseResult<&Staircase> {
        self.staircases
            .get(staircase_id)
            .ok_or(StaircaseError::UnknownStaircase { id: staircase_id, count: self.staircases.len() })
    }

    /// Tracked level of a staircase. Never mutates.
    pub fn next_level(&self, staircase_id: usize) -> StaircaseResult<i64> {
        self.staircase(staircase_id).map(Staircase::current_level)
    }

    pub fn trial_count(&self) -> u32 {
        self.log.len() as u32
    }

    pub fn total_inversions(&self) -> u32 {
        self.staircases.iter().map(Staircase::inversion_count).sum()
    }

    /// Record a response presented at the staircase's tracked level.
    pub fn record_response(
        &mut self, staircase_id: usize, response: Response,
    ) -> StaircaseResult<&Staircase> {
        let level = self.next_level(staircase_id)?;
        self.record_presented(staircase_id, level, response)
    }

    /// Record a response to a trial shown at `level_presented`.
    ///
    /// The trial is logged with `level_presented`; the staircase update
    /// always starts from its own tracked level.
    ///
    /// # Errors
    /// [`StaircaseError::UnknownStaircase`]; no state is modified.
    pub fn record_presented(
        &mut self, staircase_id: usize, level_presented: i64, response: Response,
    ) -> StaircaseResult<&Staircase> {
        let count = self.staircases.len();
        let staircase = self
            .staircases
            .get_mut(staircase_id)
            .ok_or(StaircaseError::UnknownStaircase { id: staircase_id, count })?;
        self.log.push(Trial {
            trial_index: self.log.len() as u32 + 1,
            staircase_id,
            direction: staircase.direction(),
            level_presented,
            response,
        })?;
        staircase.apply(response, &self.step_policy, &self.bounds);
        Ok(staircase)
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_rules.evaluate(self.trial_count(), &self.staircases)
    }

    pub fn into_log(self) -> ResponseLog {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staircase::core::{HalvingMode, TotalInversions};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Staircase construction from the configured directions.
    // - Logging of presented levels and unknown-id handling.
    // - Inversion accounting across staircases and the stop predicate.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that the default configuration yields an ascending staircase at
    // the lower bound and a descending one at the upper bound.
    //
    // Given
    // -----
    // - `SessionConfig::default()`.
    //
    // Expect
    // ------
    // - next_level(0) = 17, next_level(1) = 50; id 2 is unknown.
    fn default_controller_starts_at_bounds() {
        let c = StaircaseController::new(&SessionConfig::default()).expect("valid config");

        assert_eq!(c.next_level(0), Ok(17));
        assert_eq!(c.next_level(1), Ok(50));
        assert_eq!(c.next_level(2), Err(StaircaseError::UnknownStaircase { id: 2, count: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // Ensure the logged level is the presented one while the staircase moves
    // from its own tracked level.
    //
    // Given
    // -----
    // - Ascending staircase at 17; response 0 presented at 18.
    //
    // Expect
    // ------
    // - Trial logs level 18; staircase moves 17 → 22.
    fn record_presented_logs_shown_level_and_moves_tracked_level() {
        let mut c = StaircaseController::new(&SessionConfig::default()).expect("valid config");

        let level = c.record_presented(0, 18, Response::TooSmall).expect("valid id").current_level();

        assert_eq!(level, 22);
        let t = c.log().last().copied().expect("one trial");
        assert_eq!((t.trial_index, t.staircase_id, t.level_presented), (1, 0, 18));
    }

    #[test]
    // Purpose
    // -------
    // Verify that an unknown id leaves the log and staircases untouched.
    //
    // Given
    // -----
    // - Fresh default controller; record on id 5.
    //
    // Expect
    // ------
    // - `UnknownStaircase`; empty log; levels unchanged.
    fn unknown_staircase_leaves_state_untouched() {
        let mut c = StaircaseController::new(&SessionConfig::default()).expect("valid config");
        let before = c.clone();

        assert!(c.record_response(5, Response::TooLarge).is_err());
        assert_eq!(c, before);
    }

    #[test]
    // Purpose
    // -------
    // Exercise inversion accounting and the total-inversion stop clause.
    //
    // Given
    // -----
    // - Halving policy (target 2, once), stop at 3 total inversions after 4
    //   trials; staircase 0 receives 0, 1, 0, 1.
    //
    // Expect
    // ------
    // - Three inversions on staircase 0; stop fires at trial 4.
    // - Step: 5 → 5 (1st inversion) → 2 (2nd) → 2 (3rd, once mode).
    fn inversions_accumulate_and_trigger_total_stop() {
        let stop = StopRules::new(None, Some(TotalInversions { max_total: 3, min_trials: 4 }), None)
            .expect("valid rules");
        let config = SessionConfig {
            step_policy: StepPolicy::halve_after(2, HalvingMode::OnceAtTarget).expect("valid"),
            stop_rules: stop,
            ..SessionConfig::default()
        };
        let mut c = StaircaseController::new(&config).expect("valid config");

        let mut steps = Vec::new();
        for code in [0, 1, 0, 1] {
            let r = Response::from_code(code).expect("valid code");
            steps.push(c.record_response(0, r).expect("valid id").step_size());
        }

        assert_eq!(steps, vec![5, 5, 2, 2]);
        assert_eq!(c.total_inversions(), 3);
        assert_eq!(c.stop_reason(), Some(StopReason::TotalInversions { total: 3, trials: 4 }));
    }
}
