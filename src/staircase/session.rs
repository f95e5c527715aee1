//! Session — the single owner of a running two-staircase experiment.
//!
//! Purpose
//! -------
//! Tie the controller, scheduler and stop predicate together behind a
//! pull-based API. Whatever drives the experiment (a test, a batch replay,
//! a thin presentation layer) asks for the next trial, shows it, and feeds
//! the response back.
//!
//! Key behaviors
//! -------------
//! - [`Session::next_trial`] schedules the next trial and is idempotent
//!   until a response is recorded.
//! - [`Session::record_response`] validates the response code, schedules a
//!   trial implicitly when none is pending, records it and evaluates the
//!   stop predicate.
//! - Once a stop clause fires the session is frozen: every later call to
//!   `next_trial` / `record_response` returns
//!   [`StaircaseError::SessionFinished`].
//! - [`Session::run`] drives the loop with a [`Presenter`] until the session
//!   stops.
//!
//! Invariants & assumptions
//! ------------------------
//! - All mutable experiment state lives inside the session.
//! - An invalid response leaves the session exactly as it was.
//! - The scheduler RNG is injected; [`Session::new`] seeds a
//!   `Xoshiro256PlusPlus` from `SessionConfig::seed`.
//!
//! Logging
//! -------
//! - `trace` event per recorded trial, `debug` event when the session stops.
use crate::staircase::{
    controller::StaircaseController,
    core::{Response, ResponseLog, SessionConfig, Staircase, StopReason, Trial},
    errors::{StaircaseError, StaircaseResult},
    presenter::Presenter,
    scheduler::{PendingTrial, TrialScheduler},
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Session<R = Xoshiro256PlusPlus> {
    subject_id: String,
    config: SessionConfig,
    controller: StaircaseController,
    scheduler: TrialScheduler<R>,
    pending: Option<PendingTrial>,
    stop_reason: Option<StopReason>,
}

/// End-of-session (or progress) summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub subject_id: String,
    pub trials: u32,
    pub total_inversions: u32,
    pub staircases: Vec<Staircase>,
    pub stop_reason: Option<StopReason>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Subject: {}", self.subject_id)?;
        writeln!(f, "Total trials: {}", self.trials)?;
        writeln!(f, "Total inversions: {}", self.total_inversions)?;
        for s in &self.staircases {
            writeln!(
                f,
                "  staircase {} ({}): level {}, step {}, inversions {}",
                s.id(),
                s.direction(),
                s.current_level(),
                s.step_size(),
                s.inversion_count()
            )?;
        }
        match &self.stop_reason {
            Some(reason) => write!(f, "Stopped: {reason}"),
            None => write!(f, "Running"),
        }
    }
}

impl Session<Xoshiro256PlusPlus> {
    /// Session with the scheduler RNG seeded from `config.seed`.
    ///
    /// # Errors
    /// Propagates configuration validation failures.
    pub fn new(subject_id: impl Into<String>, config: SessionConfig) -> StaircaseResult<Self> {
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        Self::with_rng(subject_id, config, rng)
    }
}

impl<R: Rng> Session<R> {
    /// Session with an explicitly injected RNG.
    pub fn with_rng(
        subject_id: impl Into<String>, config: SessionConfig, rng: R,
    ) -> StaircaseResult<Self> {
        let controller = StaircaseController::new(&config)?;
        let scheduler = TrialScheduler::new(config.dither, rng);
        Ok(Self {
            subject_id: subject_id.into(),
            config,
            controller,
            scheduler,
            pending: None,
            stop_reason: None,
        })
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn staircases(&self) -> &[Staircase] {
        self.controller.staircases()
    }

    pub fn log(&self) -> &ResponseLog {
        self.controller.log()
    }

    pub fn trial_count(&self) -> u32 {
        self.controller.trial_count()
    }

    pub fn is_finished(&self) -> bool {
        self.stop_reason.is_some()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Tracked level of one staircase (no scheduling side effects).
    pub fn next_level(&self, staircase_id: usize) -> StaircaseResult<i64> {
        self.controller.next_level(staircase_id)
    }

    /// The pending trial, scheduling it if necessary.
    ///
    /// # Errors
    /// [`StaircaseError::SessionFinished`] once the session has stopped.
    pub fn next_trial(&mut self) -> StaircaseResult<PendingTrial> {
        if self.is_finished() {
            return Err(StaircaseError::SessionFinished);
        }
        if let Some(pending) = self.pending {
            return Ok(pending);
        }
        let pending = self.scheduler.schedule(&self.controller)?;
        self.pending = Some(pending);
        Ok(pending)
    }

    /// Record the response to the pending trial.
    ///
    /// # Errors
    /// - [`StaircaseError::InvalidResponse`] unless `response` is 0 or 1; the
    ///   session is unchanged.
    /// - [`StaircaseError::SessionFinished`] once the session has stopped.
    pub fn record_response(&mut self, response: u8) -> StaircaseResult<Trial> {
        let response = Response::try_from(response)?;
        let pending = self.next_trial()?;
        let direction = self
            .controller
            .record_presented(pending.staircase_id, pending.level_presented, response)?
            .direction();
        self.pending = None;
        let trial = Trial {
            trial_index: pending.trial_index,
            staircase_id: pending.staircase_id,
            direction,
            level_presented: pending.level_presented,
            response,
        };
        trace!(
            subject = %self.subject_id,
            trial = trial.trial_index,
            staircase = trial.staircase_id,
            level = trial.level_presented,
            response = response.code(),
            "trial recorded"
        );
        if let Some(reason) = self.controller.stop_reason() {
            debug!(
                subject = %self.subject_id,
                trials = self.trial_count(),
                total_inversions = self.controller.total_inversions(),
                %reason,
                "session stopped"
            );
            self.stop_reason = Some(reason);
        }
        Ok(trial)
    }

    /// Drive the session with `presenter` until it stops.
    ///
    /// # Errors
    /// Propagates presenter failures and invalid responses; trials recorded
    /// before the failure are kept.
    pub fn run<P: Presenter + ?Sized>(
        &mut self, presenter: &mut P,
    ) -> StaircaseResult<SessionSummary> {
        while !self.is_finished() {
            let pending = self.next_trial()?;
            let response = presenter.present(&pending)?;
            self.record_response(response)?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            subject_id: self.subject_id.clone(),
            trials: self.trial_count(),
            total_inversions: self.controller.total_inversions(),
            staircases: self.staircases().to_vec(),
            stop_reason: self.stop_reason,
        }
    }

    /// Consume the session and keep its trial log.
    pub fn into_log(self) -> ResponseLog {
        self.controller.into_log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staircase::core::{DitherOptions, StopRules};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Idempotent scheduling and implicit scheduling in `record_response`.
    // - Validation before mutation and session freezing.
    // - Deterministic `max_trials` stop and summary contents.
    // -------------------------------------------------------------------------

    fn capped(max_trials: u32) -> SessionConfig {
        SessionConfig {
            stop_rules: StopRules::max_trials_only(max_trials).expect("valid rules"),
            ..SessionConfig::default()
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure `next_trial` does not advance or redraw until a response
    // arrives, even with jitter enabled.
    //
    // Given
    // -----
    // - p_dither = 1 session; three consecutive `next_trial` calls.
    //
    // Expect
    // ------
    // - Identical pending trials; no trials recorded.
    fn next_trial_is_idempotent_until_response() {
        let config = SessionConfig {
            dither: DitherOptions::new(1.0, false).expect("valid"),
            ..capped(10)
        };
        let mut s = Session::new("s01", config).expect("valid config");

        let a = s.next_trial().expect("running");
        let b = s.next_trial().expect("running");
        let c = s.next_trial().expect("running");

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(s.trial_count(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Verify an invalid response is rejected without side effects.
    //
    // Given
    // -----
    // - Fresh session; `record_response(2)`.
    //
    // Expect
    // ------
    // - `InvalidResponse { value: 2 }`; no trial, nothing pending, levels
    //   unchanged.
    fn invalid_response_leaves_session_untouched() {
        let mut s = Session::new("s01", capped(10)).expect("valid config");

        assert_eq!(s.record_response(2), Err(StaircaseError::InvalidResponse { value: 2 }));
        assert_eq!(s.trial_count(), 0);
        assert_eq!(s.next_level(0), Ok(17));
        assert_eq!(s.next_level(1), Ok(50));
    }

    #[test]
    // Purpose
    // -------
    // Check the trial cap stops the session deterministically and freezes
    // it afterwards.
    //
    // Given
    // -----
    // - max_trials = 4; four "0" responses, then another attempt.
    //
    // Expect
    // ------
    // - Finished after exactly 4 trials with `MaxTrials`; later calls return
    //   `SessionFinished` and the log length stays 4.
    fn max_trials_stops_and_freezes_session() {
        let mut s = Session::new("s01", capped(4)).expect("valid config");
        for _ in 0..4 {
            s.record_response(0).expect("running");
        }

        assert!(s.is_finished());
        assert_eq!(s.stop_reason(), Some(StopReason::MaxTrials { trials: 4 }));
        assert_eq!(s.record_response(1), Err(StaircaseError::SessionFinished));
        assert_eq!(s.next_trial(), Err(StaircaseError::SessionFinished));
        assert_eq!(s.log().len(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the summary reflects per-staircase state and totals.
    //
    // Given
    // -----
    // - Responses 0, 1, 1, 1 (staircase 0 gets 0 then 1 → one inversion).
    //
    // Expect
    // ------
    // - 4 trials, 1 inversion, staircase 0 at 18 with step 4.
    fn summary_reports_totals_and_staircase_state() {
        let mut s = Session::new("s02", capped(4)).expect("valid config");
        for code in [0, 1, 1, 1] {
            s.record_response(code).expect("running");
        }
        let summary = s.summary();

        assert_eq!(summary.trials, 4);
        assert_eq!(summary.total_inversions, 1);
        assert_eq!(summary.staircases[0].current_level(), 18);
        assert_eq!(summary.staircases[0].step_size(), 4);
        assert!(summary.to_string().contains("Total inversions: 1"));
    }
}
