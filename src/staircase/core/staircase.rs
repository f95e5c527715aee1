//! Staircase — one adaptive tracker of a stimulus level.
//!
//! Purpose
//! -------
//! Hold the per-staircase state (level, step, last response, inversion
//! count) and apply the up/down update rule for a single response.
//!
//! Key behaviors
//! -------------
//! - [`Response`] is the validated binary answer: `TooLarge` (code 1) moves
//!   the level down, `TooSmall` (code 0) moves it up.
//! - [`Staircase::apply`] counts an inversion when the response differs
//!   from the previous one, shrinks the step through the configured
//!   [`StepPolicy`], then moves by the *reduced* step and clamps.
//!
//! Invariants & assumptions
//! ------------------------
//! - `bounds.min() <= current_level <= bounds.max()` at all times.
//! - `step_size >= min_step` at all times.
//! - `inversion_count` never decreases.
use crate::staircase::{
    core::config::{Direction, LevelBounds, StepPolicy},
    errors::{StaircaseError, StaircaseResult},
};

/// Binary subject answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// Code 0: the stimulus looked too small; the level goes up.
    TooSmall,
    /// Code 1: the stimulus looked too large; the level goes down.
    TooLarge,
}

impl Response {
    /// Validate a raw response code.
    ///
    /// # Errors
    /// [`StaircaseError::InvalidResponse`] unless `code` is 0 or 1.
    pub fn from_code(code: i64) -> StaircaseResult<Self> {
        match code {
            0 => Ok(Response::TooSmall),
            1 => Ok(Response::TooLarge),
            value => Err(StaircaseError::InvalidResponse { value }),
        }
    }

    /// Raw code as stored in the trial log.
    pub fn code(&self) -> u8 {
        match self {
            Response::TooSmall => 0,
            Response::TooLarge => 1,
        }
    }
}

impl TryFrom<u8> for Response {
    type Error = StaircaseError;

    fn try_from(code: u8) -> StaircaseResult<Self> {
        Response::from_code(i64::from(code))
    }
}

/// One staircase's tracked level and step, with the inversion history the
/// update rule needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staircase {
    id: usize,
    direction: Direction,
    current_level: i64,
    step_size: i64,
    min_step: i64,
    last_response: Option<Response>,
    inversion_count: u32,
}

impl Staircase {
    /// New staircase at its direction's starting bound.
    ///
    /// `initial_step` and `min_step` are expected to be validated already
    /// (see [`SessionConfig::validate`](crate::staircase::core::config::SessionConfig::validate));
    /// the step is still floored at `min_step` here.
    pub fn new(
        id: usize, direction: Direction, bounds: &LevelBounds, initial_step: i64, min_step: i64,
    ) -> Self {
        Self {
            id,
            direction,
            current_level: direction.start_level(bounds),
            step_size: initial_step.max(min_step),
            min_step,
            last_response: None,
            inversion_count: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn current_level(&self) -> i64 {
        self.current_level
    }

    pub fn step_size(&self) -> i64 {
        self.step_size
    }

    pub fn min_step(&self) -> i64 {
        self.min_step
    }

    pub fn last_response(&self) -> Option<Response> {
        self.last_response
    }

    pub fn inversion_count(&self) -> u32 {
        self.inversion_count
    }

    /// Apply one response; returns `true` when it was an inversion.
    pub fn apply(&mut self, response: Response, policy: &StepPolicy, bounds: &LevelBounds) -> bool {
        let inverted = matches!(self.last_response, Some(prev) if prev != response);
        if inverted {
            self.inversion_count += 1;
            self.step_size = policy.reduce(self.step_size, self.min_step, self.inversion_count);
        }
        self.last_response = Some(response);
        let moved = match response {
            Response::TooLarge => self.current_level.saturating_sub(self.step_size),
            Response::TooSmall => self.current_level.saturating_add(self.step_size),
        };
        self.current_level = bounds.clamp(moved);
        inverted
    }

    #[cfg(test)]
    pub(crate) fn set_inversion_count_for_test(&mut self, n: u32) {
        self.inversion_count = n;
    }
}
