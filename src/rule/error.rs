//! Error types for rule parsing and conversion

use std::fmt;
use std::io;
use std::sync::Arc;

/// Errors raised while turning a rule string into a state vector
///
/// These errors cover the whole conversion pipeline: lexing and parsing the
/// rule string, and resolving the identifiers it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The rule string was empty
    EmptyRule,
    /// The rule string failed to parse
    InvalidSyntax {
        /// What the parser objected to
        message: Arc<str>,
        /// The original rule string
        input: Arc<str>,
        /// Byte offset of the offending token, when known
        position: Option<usize>,
    },
    /// The rule references a variable the engine does not know
    UndefinedVariable {
        /// The unresolved identifier
        name: Arc<str>,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::EmptyRule => write!(f, "Cannot parse an empty rule string"),
            RuleError::InvalidSyntax {
                message,
                input,
                position,
            } => {
                if let Some(pos) = position {
                    write!(
                        f,
                        "Invalid rule syntax at position {}: {}. Input: {:?}",
                        pos, message, input
                    )
                } else {
                    write!(f, "Invalid rule syntax: {}. Input: {:?}", message, input)
                }
            }
            RuleError::UndefinedVariable { name } => {
                write!(f, "Variable '{}' is not defined in the engine", name)
            }
        }
    }
}

impl std::error::Error for RuleError {}

impl From<RuleError> for io::Error {
    fn from(err: RuleError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}
