//! Errors for reading and writing session files.
use crate::staircase::errors::StaircaseError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use std::fmt;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug)]
pub enum PersistenceError {
    /// Underlying file or stream failure.
    Io(std::io::Error),

    /// Malformed row (1-indexed line).
    Parse { line: usize, message: String },

    /// Header does not match the expected layout.
    InvalidHeader { expected: String, found: String },

    /// A subject name that would break the CSV layout.
    InvalidSubject { subject: String },

    /// Aggregate tables need `min <= max`.
    InvalidLevelRange { min: i64, max: i64 },

    /// The parsed rows do not form a valid trial log.
    Log(StaircaseError),
}

impl std::error::Error for PersistenceError {}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "IO error: {e}"),
            PersistenceError::Parse { line, message } => {
                write!(f, "Parse error at line {line}: {message}")
            }
            PersistenceError::InvalidHeader { expected, found } => {
                write!(f, "Invalid header: expected '{expected}', found '{found}'")
            }
            PersistenceError::InvalidSubject { subject } => {
                write!(f, "Invalid subject name '{subject}': empty or contains a comma or newline")
            }
            PersistenceError::InvalidLevelRange { min, max } => {
                write!(f, "Invalid level range {min}..={max}: min must not exceed max")
            }
            PersistenceError::Log(e) => write!(f, "Invalid trial log: {e}"),
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err)
    }
}

impl From<StaircaseError> for PersistenceError {
    fn from(err: StaircaseError) -> Self {
        PersistenceError::Log(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<PersistenceError> for PyErr {
    fn from(err: PersistenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Subject names are written unquoted into CSV cells.
pub(crate) fn validate_subject(subject: &str) -> PersistenceResult<()> {
    if subject.is_empty() || subject.contains([',', '\n', '\r']) {
        return Err(PersistenceError::InvalidSubject { subject: subject.to_string() });
    }
    Ok(())
}
