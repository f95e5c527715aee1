//! TrialScheduler — picks the next staircase and the level actually shown.
//!
//! Purpose
//! -------
//! Alternate staircases by trial index and apply the optional cosmetic
//! perturbations (jitter, anti-repeat) to the presented level. The scheduler
//! only reads staircase state; it never mutates it.
//!
//! Key behaviors
//! -------------
//! - Trial `t` (1-based) fires staircase `(t - 1) mod N`.
//! - Jitter: with probability `p_dither` the tracked level is offset by a
//!   uniform draw from `{-1, 0, +1}` and clamped.
//! - Anti-repeat: a presented level equal to the previously presented one
//!   (any staircase) is shifted by ±1 in a uniformly chosen direction and
//!   clamped; if clamping undoes the shift the opposite direction is used.
//!
//! Conventions
//! -----------
//! - Randomness comes from an injected [`rand::Rng`]; no random number is
//!   drawn when both perturbations are disabled, so such sessions are fully
//!   deterministic regardless of the seed.
//! - Jitter never compounds: each trial starts from the tracked level.
use crate::staircase::{
    controller::StaircaseController,
    core::{DitherOptions, LevelBounds},
    errors::StaircaseResult,
};
use rand::Rng;

/// A scheduled trial awaiting its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTrial {
    pub trial_index: u32,
    pub staircase_id: usize,
    pub level_presented: i64,
}

#[derive(Debug, Clone)]
pub struct TrialScheduler<R> {
    rng: R,
    dither: DitherOptions,
    last_presented: Option<i64>,
}

/// Round-robin staircase choice for a 1-based trial index.
pub fn staircase_for_trial(trial_index: u32, staircase_count: usize) -> usize {
    (trial_index.saturating_sub(1) as usize) % staircase_count.max(1)
}

impl<R: Rng> TrialScheduler<R> {
    pub fn new(dither: DitherOptions, rng: R) -> Self {
        Self { rng, dither, last_presented: None }
    }

    pub fn dither(&self) -> &DitherOptions {
        &self.dither
    }

    /// Level presented on the previous scheduled trial, if any.
    pub fn last_presented(&self) -> Option<i64> {
        self.last_presented
    }

    /// Schedule the trial following the controller's last recorded one.
    ///
    /// # Errors
    /// Propagates [`StaircaseController::next_level`] failures, which cannot
    /// occur for a controller built from a validated configuration.
    pub fn schedule(&mut self, controller: &StaircaseController) -> StaircaseResult<PendingTrial> {
        let trial_index = controller.trial_count() + 1;
        let staircase_id = staircase_for_trial(trial_index, controller.staircases().len());
        let tracked = controller.next_level(staircase_id)?;
        let level_presented = self.perturb(tracked, controller.bounds());
        self.last_presented = Some(level_presented);
        Ok(PendingTrial { trial_index, staircase_id, level_presented })
    }

    fn perturb(&mut self, tracked: i64, bounds: &LevelBounds) -> i64 {
        let mut level = tracked;
        let p = self.dither.p_dither();
        if p > 0.0 && self.rng.random_bool(p) {
            let offset = self.rng.random_range(-1i64..=1);
            level = bounds.clamp(level.saturating_add(offset));
        }
        if self.dither.anti_repeat() && self.last_presented == Some(level) {
            let shift = if self.rng.random_bool(0.5) { 1 } else { -1 };
            let shifted = bounds.clamp(level.saturating_add(shift));
            level =
                if shifted != level { shifted } else { bounds.clamp(level.saturating_sub(shift)) };
        }
        level
    }
}
