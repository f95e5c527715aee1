//! staircase — adaptive up/down staircase procedure for threshold search.
//!
//! Purpose
//! -------
//! Run the data-collection half of the experiment: interleaved staircases
//! that move a scalar stimulus level down after a "too large" answer and up
//! after a "too small" one, shrinking their step on each inversion, until a
//! stop clause ends the session.
//!
//! Key behaviors
//! -------------
//! - [`core`]: validated configuration, per-staircase state and update rule,
//!   stop rules, and the append-only trial log.
//! - [`controller`]: owns the staircase set, applies responses, evaluates
//!   the stop predicate.
//! - [`scheduler`]: round-robin staircase choice, jitter and anti-repeat
//!   on the presented level.
//! - [`session`]: the single owner of a running experiment with a
//!   pull-based `next_trial` / `record_response` API.
//! - [`presenter`]: the presentation interface plus replay and simulated
//!   subjects.
//!
//! Invariants & assumptions
//! ------------------------
//! - Levels stay within the configured bounds; steps never fall below the
//!   floor.
//! - One trial is logged per accepted response; a stopped session accepts
//!   none.
//!
//! Conventions
//! -----------
//! - Response code 1 = "too large", 0 = "too small".
//! - Staircase ids are 0-based, trial indices 1-based.
//! - Single-threaded and synchronous; no I/O happens here.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its local rules; the end-to-end
//!   session → fit pipeline is covered in `tests/`.

pub mod controller;
pub mod core;
pub mod errors;
pub mod presenter;
pub mod scheduler;
pub mod session;

pub use self::controller::StaircaseController;
pub use self::core::{
    Direction, DitherOptions, HalvingMode, LevelBounds, Response, ResponseLog, SessionConfig,
    Staircase, StepPolicy, StopReason, StopRules, TotalInversions, Trial,
};
pub use self::errors::{StaircaseError, StaircaseResult};
pub use self::presenter::{Presenter, ReplayPresenter, SimulatedObserver};
pub use self::scheduler::{PendingTrial, TrialScheduler};
pub use self::session::{Session, SessionSummary};

pub mod prelude {
    pub use super::core::{
        Direction, DitherOptions, HalvingMode, LevelBounds, Response, ResponseLog, SessionConfig,
        StepPolicy, StopReason, StopRules, TotalInversions, Trial,
    };
    pub use super::errors::{StaircaseError, StaircaseResult};
    pub use super::presenter::{Presenter, ReplayPresenter, SimulatedObserver};
    pub use super::scheduler::PendingTrial;
    pub use super::session::{Session, SessionSummary};
}
