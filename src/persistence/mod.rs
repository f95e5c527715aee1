//! persistence — CSV storage for trial logs and the cross-subject table.
//!
//! Purpose
//! -------
//! Keep a finished session on disk so it can be refitted later, and keep one
//! table of per-level proportions across all subjects.
//!
//! Key behaviors
//! -------------
//! - [`trial_log`]: write and read one subject's log
//!   (`subject,trial,staircase,direction,level,response`).
//! - [`aggregate`]: the subject × level table with upsert, save and
//!   load-or-new.
//!
//! Conventions
//! -----------
//! - Plain comma-separated text with no quoting; subject names containing
//!   commas or newlines are rejected on write.
//! - Line numbers in parse errors are 1-based and count the header.

pub mod aggregate;
pub mod errors;
pub mod trial_log;

pub use self::aggregate::{AggregateRow, AggregateTable, DEFAULT_TABLE_LEVELS};
pub use self::errors::{PersistenceError, PersistenceResult};
pub use self::trial_log::{
    SubjectLog, TRIAL_LOG_HEADER, load_trial_log, read_trial_log, save_trial_log, write_trial_log,
};

pub mod prelude {
    pub use super::aggregate::AggregateTable;
    pub use super::errors::{PersistenceError, PersistenceResult};
    pub use super::trial_log::{SubjectLog, load_trial_log, save_trial_log};
}
