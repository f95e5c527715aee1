//! Staircase configuration — level bounds, step policy, dithering, session setup.
//!
//! Purpose
//! -------
//! Collect every construction-time knob of a staircase session in validated
//! types so the controller and scheduler can assume sane values without
//! rechecking them on each trial.
//!
//! Key behaviors
//! -------------
//! - [`LevelBounds`] fixes the inclusive stimulus range and clamps levels.
//! - [`Direction`] tags a staircase as ascending or descending and decides
//!   which bound it starts from.
//! - [`StepPolicy`] selects how the step shrinks on an inversion: decrement
//!   on every inversion, or halve once a target inversion count is reached.
//! - [`DitherOptions`] configures the cosmetic jitter and anti-repeat
//!   perturbations applied by the scheduler.
//! - [`SessionConfig`] bundles the above with the stop rules, the staircase
//!   set, target probabilities and the RNG seed.
//!
//! Invariants & assumptions
//! ------------------------
//! - `bounds.min() < bounds.max()`.
//! - `initial_step >= min_step >= 1`.
//! - `0 <= p_dither <= 1`; target probabilities lie in `(0, 1)`.
//! - At least one staircase and one stop clause exist.
//!
//! Conventions
//! -----------
//! - Levels and steps are integers (`i64`); the level is an abstract scalar
//!   such as a stimulus diameter.
//! - Defaults reproduce the reference two-staircase experiment: bounds
//!   `[17, 50]`, step 5 with floor 1, decrement policy, an ascending and a
//!   descending staircase.
use crate::staircase::{
    core::stop::StopRules,
    errors::{StaircaseError, StaircaseResult},
};
use std::str::FromStr;

/// Inclusive `[min, max]` range of presentable levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    min: i64,
    max: i64,
}

impl LevelBounds {
    /// Construct bounds with `min < max`.
    ///
    /// # Errors
    /// [`StaircaseError::InvalidBounds`] when `min >= max`.
    pub fn new(min: i64, max: i64) -> StaircaseResult<Self> {
        if min >= max {
            return Err(StaircaseError::InvalidBounds {
                min,
                max,
                reason: "Lower bound must be strictly below the upper bound.",
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn clamp(&self, level: i64) -> i64 {
        level.clamp(self.min, self.max)
    }

    pub fn contains(&self, level: i64) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

impl Default for LevelBounds {
    fn default() -> Self {
        Self { min: 17, max: 50 }
    }
}

/// Semantic tag of a staircase; decides only the starting bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Starts at the lower bound.
    Ascending,
    /// Starts at the upper bound.
    Descending,
}

impl Direction {
    pub fn start_level(&self, bounds: &LevelBounds) -> i64 {
        match self {
            Direction::Ascending => bounds.min(),
            Direction::Descending => bounds.max(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Accepts `ascending`/`up` and `descending`/`down`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascending" | "up" => Ok(Direction::Ascending),
            "descending" | "down" => Ok(Direction::Descending),
            other => Err(format!("unknown staircase direction '{other}'")),
        }
    }
}

/// Repeat behavior of the halving policy once the target is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalvingMode {
    /// Halve on every inversion whose count is `>= target_inversions`.
    EveryInversion,
    /// Halve only on the inversion whose count equals `target_inversions`.
    OnceAtTarget,
}

/// Step-reduction policy applied when a staircase inverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// `step = max(min_step, step - 1)` on every inversion.
    Decrement,
    /// `step = max(min_step, step / 2)` once `target_inversions` is reached.
    HalveAfter { target_inversions: u32, mode: HalvingMode },
}

impl StepPolicy {
    /// Validated halving policy.
    ///
    /// # Errors
    /// [`StaircaseError::InvalidTargetInversions`] when `target_inversions == 0`.
    pub fn halve_after(target_inversions: u32, mode: HalvingMode) -> StaircaseResult<Self> {
        if target_inversions == 0 {
            return Err(StaircaseError::InvalidTargetInversions {
                value: target_inversions,
                reason: "Target inversions must be greater than zero.",
            });
        }
        Ok(StepPolicy::HalveAfter { target_inversions, mode })
    }

    /// Step in effect after an inversion that brought the count to
    /// `inversion_count`. Never returns less than `min_step`.
    pub fn reduce(&self, step: i64, min_step: i64, inversion_count: u32) -> i64 {
        match *self {
            StepPolicy::Decrement => (step - 1).max(min_step),
            StepPolicy::HalveAfter { target_inversions, mode } => {
                let due = match mode {
                    HalvingMode::EveryInversion => inversion_count >= target_inversions,
                    HalvingMode::OnceAtTarget => inversion_count == target_inversions,
                };
                if due { (step / 2).max(min_step) } else { step }
            }
        }
    }
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy::Decrement
    }
}

/// Cosmetic perturbations of the presented level.
///
/// - `p_dither`: probability of adding a uniform draw from `{-1, 0, +1}`.
/// - `anti_repeat`: shift by ±1 when the presented level would equal the
///   previously presented one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    p_dither: f64,
    anti_repeat: bool,
}

impl DitherOptions {
    /// # Errors
    /// [`StaircaseError::InvalidDitherProbability`] unless `0 <= p_dither <= 1`.
    pub fn new(p_dither: f64, anti_repeat: bool) -> StaircaseResult<Self> {
        if !(0.0..=1.0).contains(&p_dither) {
            return Err(StaircaseError::InvalidDitherProbability { value: p_dither });
        }
        Ok(Self { p_dither, anti_repeat })
    }

    pub fn p_dither(&self) -> f64 {
        self.p_dither
    }

    pub fn anti_repeat(&self) -> bool {
        self.anti_repeat
    }

    /// `true` when neither perturbation can fire, so no randomness is drawn.
    pub fn is_disabled(&self) -> bool {
        self.p_dither == 0.0 && !self.anti_repeat
    }
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self { p_dither: 0.0, anti_repeat: false }
    }
}

/// SessionConfig — complete construction-time configuration of a session.
///
/// Purpose
/// -------
/// Bundle bounds, step parameters, stop rules, dithering, the staircase set
/// and reporting targets so that a session can be built from one validated
/// value.
///
/// Fields
/// ------
/// - `bounds`: presentable level range.
/// - `initial_step`, `min_step`: starting step and its floor.
/// - `step_policy`: reduction applied on inversions.
/// - `stop_rules`: enabled stop clauses.
/// - `dither`: scheduler perturbations.
/// - `directions`: one entry per staircase, in id order.
/// - `target_probabilities`: probabilities reported as thresholds after the
///   fit.
/// - `seed`: seed of the scheduler RNG.
///
/// Invariants
/// ----------
/// - `initial_step >= min_step >= 1`.
/// - `directions` is non-empty.
/// - Every target probability lies in `(0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub bounds: LevelBounds,
    pub initial_step: i64,
    pub min_step: i64,
    pub step_policy: StepPolicy,
    pub stop_rules: StopRules,
    pub dither: DitherOptions,
    pub directions: Vec<Direction>,
    pub target_probabilities: Vec<f64>,
    pub seed: u64,
}

impl SessionConfig {
    /// Construct and validate a session configuration.
    ///
    /// Errors
    /// ------
    /// - [`StaircaseError::InvalidStep`] for a non-positive `min_step` or an
    ///   `initial_step` below `min_step`.
    /// - [`StaircaseError::NoStaircases`] for an empty `directions`.
    /// - [`StaircaseError::InvalidTargetProbability`] for a target outside
    ///   `(0, 1)`.
    pub fn new(
        bounds: LevelBounds, initial_step: i64, min_step: i64, step_policy: StepPolicy,
        stop_rules: StopRules, dither: DitherOptions, directions: Vec<Direction>,
        target_probabilities: Vec<f64>, seed: u64,
    ) -> StaircaseResult<Self> {
        let config = Self {
            bounds,
            initial_step,
            min_step,
            step_policy,
            stop_rules,
            dither,
            directions,
            target_probabilities,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the invariants; used by `new` and by sessions built from a
    /// hand-assembled value.
    pub fn validate(&self) -> StaircaseResult<()> {
        if self.min_step < 1 {
            return Err(StaircaseError::InvalidStep {
                name: "min_step",
                value: self.min_step,
                reason: "Minimum step must be at least 1.",
            });
        }
        if self.initial_step < self.min_step {
            return Err(StaircaseError::InvalidStep {
                name: "initial_step",
                value: self.initial_step,
                reason: "Initial step must be at least the minimum step.",
            });
        }
        if self.directions.is_empty() {
            return Err(StaircaseError::NoStaircases);
        }
        if let Some(&p) = self.target_probabilities.iter().find(|&&p| !(p > 0.0 && p < 1.0)) {
            return Err(StaircaseError::InvalidTargetProbability { value: p });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bounds: LevelBounds::default(),
            initial_step: 5,
            min_step: 1,
            step_policy: StepPolicy::Decrement,
            stop_rules: StopRules::default(),
            dither: DitherOptions::default(),
            directions: vec![Direction::Ascending, Direction::Descending],
            target_probabilities: vec![0.5, 0.7, 0.8],
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation of bounds, dither probability and session configuration.
    // - Step reduction under both policies and both halving modes.
    // - Direction parsing and start levels.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure inverted or empty bounds are rejected and clamping works.
    //
    // Given
    // -----
    // - (50, 17), (17, 17) and the default (17, 50).
    //
    // Expect
    // ------
    // - Errors for the first two; clamp maps 5 → 17 and 60 → 50.
    fn level_bounds_reject_inverted_ranges_and_clamp() {
        assert!(matches!(LevelBounds::new(50, 17), Err(StaircaseError::InvalidBounds { .. })));
        assert!(LevelBounds::new(17, 17).is_err());

        let b = LevelBounds::default();
        assert_eq!(b.clamp(5), 17);
        assert_eq!(b.clamp(60), 50);
        assert_eq!(b.clamp(30), 30);
        assert!(b.contains(17) && b.contains(50) && !b.contains(51));
    }

    #[test]
    // Purpose
    // -------
    // Check the decrement policy never drops below the floor.
    //
    // Given
    // -----
    // - step 2 and step 1 with floor 1.
    //
    // Expect
    // ------
    // - 2 → 1, 1 → 1.
    fn decrement_policy_respects_floor() {
        let p = StepPolicy::Decrement;
        assert_eq!(p.reduce(2, 1, 1), 1);
        assert_eq!(p.reduce(1, 1, 7), 1);
    }

    #[test]
    // Purpose
    // -------
    // Distinguish the two halving modes around the target count.
    //
    // Given
    // -----
    // - target 3, step 8, floor 1; inversion counts 2, 3 and 4.
    //
    // Expect
    // ------
    // - Below target: unchanged for both modes.
    // - At target: halved for both.
    // - Past target: halved only for `EveryInversion`.
    fn halving_modes_differ_past_the_target() {
        let every = StepPolicy::halve_after(3, HalvingMode::EveryInversion).expect("valid");
        let once = StepPolicy::halve_after(3, HalvingMode::OnceAtTarget).expect("valid");

        assert_eq!(every.reduce(8, 1, 2), 8);
        assert_eq!(once.reduce(8, 1, 2), 8);
        assert_eq!(every.reduce(8, 1, 3), 4);
        assert_eq!(once.reduce(8, 1, 3), 4);
        assert_eq!(every.reduce(4, 1, 4), 2);
        assert_eq!(once.reduce(4, 1, 4), 4);
        assert_eq!(every.reduce(1, 1, 9), 1);
        assert!(StepPolicy::halve_after(0, HalvingMode::EveryInversion).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify session-level validation of steps, staircases and targets.
    //
    // Given
    // -----
    // - Default config with min_step 0, initial below min, no staircases, and
    //   a target of 1.0.
    //
    // Expect
    // ------
    // - The matching error for each; the default validates.
    fn session_config_validation_rejects_bad_fields() {
        assert!(SessionConfig::default().validate().is_ok());

        let cfg = SessionConfig { min_step: 0, ..SessionConfig::default() };
        assert!(matches!(cfg.validate(), Err(StaircaseError::InvalidStep { name: "min_step", .. })));

        let cfg = SessionConfig { initial_step: 2, min_step: 3, ..SessionConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(StaircaseError::InvalidStep { name: "initial_step", .. })
        ));

        let cfg = SessionConfig { directions: vec![], ..SessionConfig::default() };
        assert_eq!(cfg.validate(), Err(StaircaseError::NoStaircases));

        let cfg = SessionConfig { target_probabilities: vec![0.5, 1.0], ..SessionConfig::default() };
        assert_eq!(cfg.validate(), Err(StaircaseError::InvalidTargetProbability { value: 1.0 }));
    }

    #[test]
    // Purpose
    // -------
    // Check direction parsing aliases and start levels.
    //
    // Given
    // -----
    // - "UP", "descending", "sideways".
    //
    // Expect
    // ------
    // - Ascending starts at min, Descending at max; unknown names error.
    fn direction_parses_aliases_and_picks_start_bound() {
        let b = LevelBounds::default();
        let up: Direction = "UP".parse().expect("alias should parse");
        let down: Direction = "descending".parse().expect("name should parse");

        assert_eq!(up.start_level(&b), 17);
        assert_eq!(down.start_level(&b), 50);
        assert!("sideways".parse::<Direction>().is_err());
        assert!(DitherOptions::new(1.5, false).is_err());
        assert!(DitherOptions::default().is_disabled());
    }
}
