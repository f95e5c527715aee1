//! Presentation collaborators: anything that turns a scheduled trial into a
//! response.
//!
//! - [`Presenter`]: the narrow interface a session is driven through.
//! - [`ReplayPresenter`]: replays a fixed response sequence (batch replay of
//!   recorded data, deterministic tests).
//! - [`SimulatedObserver`]: a synthetic subject answering from a known
//!   logistic psychometric function with a seeded RNG.
use crate::{
    optimization::numerical_stability::safe_logistic,
    staircase::{
        errors::{StaircaseError, StaircaseResult},
        scheduler::PendingTrial,
    },
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Shows a stimulus and returns the subject's response code (0 or 1).
pub trait Presenter {
    fn present(&mut self, trial: &PendingTrial) -> StaircaseResult<u8>;
}

/// Replays a fixed sequence of response codes in order.
#[derive(Debug, Clone)]
pub struct ReplayPresenter {
    responses: Vec<u8>,
    cursor: usize,
}

impl ReplayPresenter {
    pub fn new(responses: Vec<u8>) -> Self {
        Self { responses, cursor: 0 }
    }

    /// Responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.responses.len() - self.cursor
    }
}

impl Presenter for ReplayPresenter {
    /// # Errors
    /// [`StaircaseError::PresenterFailed`] when the sequence is exhausted.
    fn present(&mut self, trial: &PendingTrial) -> StaircaseResult<u8> {
        let response = self.responses.get(self.cursor).copied().ok_or_else(|| {
            StaircaseError::PresenterFailed {
                reason: format!("replay exhausted at trial {}", trial.trial_index),
            }
        })?;
        self.cursor += 1;
        Ok(response)
    }
}

/// Synthetic subject with `P(response = 1 | x) = 1 / (1 + exp(-β (x - α)))`.
#[derive(Debug, Clone)]
pub struct SimulatedObserver<R = Xoshiro256PlusPlus> {
    alpha: f64,
    beta: f64,
    rng: R,
}

impl SimulatedObserver<Xoshiro256PlusPlus> {
    pub fn new(alpha: f64, beta: f64, seed: u64) -> Self {
        Self::with_rng(alpha, beta, Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulatedObserver<R> {
    pub fn with_rng(alpha: f64, beta: f64, rng: R) -> Self {
        Self { alpha, beta, rng }
    }

    /// Probability of a "too large" answer at `level`.
    pub fn p_too_large(&self, level: f64) -> f64 {
        safe_logistic(self.beta * (level - self.alpha))
    }
}

impl<R: Rng> Presenter for SimulatedObserver<R> {
    fn present(&mut self, trial: &PendingTrial) -> StaircaseResult<u8> {
        let p = self.p_too_large(trial.level_presented as f64);
        if !p.is_finite() {
            return Err(StaircaseError::PresenterFailed {
                reason: format!("non-finite response probability at level {}", trial.level_presented),
            });
        }
        Ok(u8::from(self.rng.random_bool(p)))
    }
}
