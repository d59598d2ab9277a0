//! Error types for the engine facade

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::rule::RuleError;
use crate::state_vector::StateVectorError;

/// Errors raised by [`Engine`](crate::Engine) operations
///
/// Contradictions are never errors: they are ordinary results inspected via
/// `is_contradiction`. This enum covers genuine usage and input mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A variable name violates the identifier rules
    NonConformalName {
        /// The rejected name
        name: Arc<str>,
    },
    /// A referenced variable is not part of this engine
    UnknownVariable {
        /// The unresolved name
        name: Arc<str>,
    },
    /// A query that requires a compiled engine was made before `compile`
    NotCompiled,
    /// A rule string failed to parse or convert
    Rule(RuleError),
    /// A state vector query failed
    StateVector(StateVectorError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NonConformalName { name } => {
                write!(f, "Variable name '{}' is not conformal", name)
            }
            EngineError::UnknownVariable { name } => {
                write!(f, "Variable '{}' is not defined in the engine", name)
            }
            EngineError::NotCompiled => {
                write!(f, "Engine is not compiled; call compile() first")
            }
            EngineError::Rule(err) => write!(f, "{}", err),
            EngineError::StateVector(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Rule(err) => Some(err),
            EngineError::StateVector(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RuleError> for EngineError {
    fn from(err: RuleError) -> Self {
        EngineError::Rule(err)
    }
}

impl From<StateVectorError> for EngineError {
    fn from(err: StateVectorError) -> Self {
        EngineError::StateVector(err)
    }
}

impl From<EngineError> for io::Error {
    fn from(err: EngineError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}
