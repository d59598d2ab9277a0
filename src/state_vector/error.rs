//! Error types for state vector queries

use std::fmt;
use std::io;

/// Errors related to state vector queries
///
/// These errors occur when a query is made against a state vector that
/// cannot answer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateVectorError {
    /// Asked for a variable value on a contradiction (an empty state vector)
    ContradictionQuery {
        /// The variable index that was queried
        index: i32,
    },
}

impl fmt::Display for StateVectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateVectorError::ContradictionQuery { index } => write!(
                f,
                "Cannot determine the value of variable {} for an empty state vector",
                index
            ),
        }
    }
}

impl std::error::Error for StateVectorError {}

impl From<StateVectorError> for io::Error {
    fn from(err: StateVectorError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}
