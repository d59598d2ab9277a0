//! Prediction results

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::state_vector::StateVector;

use super::error::EngineError;

/// The outcome of [`Engine::predict`](crate::Engine::predict): the product
/// of the knowledge base with one piece of evidence.
///
/// A prediction owns its result vector and shares the engine's variable
/// table, so it can be queried by variable name and moved freely between
/// threads without keeping the engine alive.
///
/// # Examples
///
/// ```
/// use vector_logic::Engine;
///
/// let mut engine = Engine::new(&["x1", "x2"]).unwrap();
/// engine.add_rule("x1 => x2").unwrap();
/// engine.compile();
///
/// let prediction = engine.predict(&[("x1", true)]).unwrap();
/// assert_eq!(prediction.value("x2").unwrap(), Some(true));
/// assert!(!prediction.is_contradiction());
/// ```
#[derive(Debug, Clone)]
pub struct Prediction {
    state_vector: StateVector,
    variable_map: Arc<BTreeMap<Arc<str>, i32>>,
    intermediate_sizes: Vec<usize>,
}

impl Prediction {
    pub(super) fn new(
        state_vector: StateVector,
        variable_map: Arc<BTreeMap<Arc<str>, i32>>,
        intermediate_sizes: Vec<usize>,
    ) -> Self {
        Prediction {
            state_vector,
            variable_map,
            intermediate_sizes,
        }
    }

    /// The deduced value of a variable: `Some(true)`, `Some(false)`, or
    /// `None` for unknown.
    ///
    /// # Errors
    ///
    /// Fails for names outside the engine's variable table and for queries
    /// against a contradictory result.
    pub fn value(&self, name: &str) -> Result<Option<bool>, EngineError> {
        let index = self
            .variable_map
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownVariable {
                name: Arc::from(name),
            })?;
        Ok(self.state_vector.var_value(index)?)
    }

    /// Whether the evidence contradicts the knowledge base.
    pub fn is_contradiction(&self) -> bool {
        self.state_vector.is_contradiction()
    }

    /// Number of cubes in the result vector.
    pub fn size(&self) -> usize {
        self.state_vector.size()
    }

    /// The raw result vector.
    pub fn state_vector(&self) -> &StateVector {
        &self.state_vector
    }

    /// Sizes of the intermediate products computed for this prediction.
    pub fn intermediate_sizes(&self) -> &[usize] {
        &self.intermediate_sizes
    }

    /// Render the result vector, padded to the engine's variable count.
    pub fn render(&self, indent: usize) -> String {
        self.state_vector
            .render(Some(self.variable_map.len()), indent)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(0))
    }
}
