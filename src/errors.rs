//! All errors that can occur while building and querying skyline models.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SkylineError {
    /// The parameter matrix does not have exactly four rows.
    InvalidShapeError(usize),
    /// The parameter matrix has no columns.
    EmptyModelError,
    /// Epidemiological parameters were requested before any interval was selected.
    NotConfiguredError,
    /// The active interval has a removal rate of zero.
    DivisionByZeroError(String),
    InvalidParameterError(String),
    UnorderedIntervalsError(String),
    LengthMismatchError {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, SkylineError>;

impl fmt::Display for SkylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkylineError::InvalidShapeError(rows) => write!(
                f,
                "InvalidShapeError: parameter matrix must have exactly 4 rows (la, psi, p, t), found {}",
                rows
            ),
            SkylineError::EmptyModelError => {
                write!(f, "EmptyModelError: parameter matrix has no intervals")
            }
            SkylineError::NotConfiguredError => write!(
                f,
                "NotConfiguredError: no interval has been selected yet"
            ),
            SkylineError::DivisionByZeroError(label) => write!(
                f,
                "DivisionByZeroError: removal rate of interval {} is zero",
                label
            ),
            SkylineError::InvalidParameterError(message) => {
                write!(f, "InvalidParameterError: {}", message)
            }
            SkylineError::UnorderedIntervalsError(message) => {
                write!(f, "UnorderedIntervalsError: {}", message)
            }
            SkylineError::LengthMismatchError {
                name,
                expected,
                found,
            } => write!(
                f,
                "LengthMismatchError: expected {} values for {}, found {}",
                expected, name, found
            ),
        }
    }
}

impl std::error::Error for SkylineError {}
