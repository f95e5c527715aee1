//! staircase::core — data types and configuration of the adaptive procedure.
//!
//! Purpose
//! -------
//! Hold the passive building blocks shared by the controller, scheduler and
//! session: validated configuration, the per-staircase update rule, the stop
//! predicate and the trial log.
//!
//! Key behaviors
//! -------------
//! - [`config`]: [`LevelBounds`], [`Direction`], [`StepPolicy`],
//!   [`DitherOptions`], [`SessionConfig`].
//! - [`stop`]: [`StopRules`] and the [`StopReason`] reported when a session
//!   ends.
//! - [`staircase`]: [`Staircase`] state and the [`Response`] code.
//! - [`trial`]: immutable [`Trial`] records and the append-only
//!   [`ResponseLog`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration types validate on construction and are treated as
//!   internally consistent downstream.
//! - Nothing in this module performs I/O, logging or random draws.

pub mod config;
pub mod staircase;
pub mod stop;
pub mod trial;

pub use self::config::{
    Direction, DitherOptions, HalvingMode, LevelBounds, SessionConfig, StepPolicy,
};
pub use self::staircase::{Response, Staircase};
pub use self::stop::{StopReason, StopRules, TotalInversions};
pub use self::trial::{ResponseLog, Trial};
