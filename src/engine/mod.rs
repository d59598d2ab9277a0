//! The engine facade: variables, rules, compilation, and prediction
//!
//! An [`Engine`] owns a fixed variable table and an append-only list of
//! rules, each stored as a [`StateVector`]. Compiling multiplies every rule
//! into a single *valid set* - the vector characterizing all assignments
//! consistent with the knowledge base - after which predictions are a single
//! product with the evidence and per-variable queries read straight off the
//! valid set.
//!
//! # Lifecycle
//!
//! Mutating operations ([`Engine::add_rule`], [`Engine::add_evidence`],
//! [`Engine::add_state_vector`]) push onto the uncompiled list and clear the
//! compiled flag. [`Engine::compile`] fuses the uncompiled vectors with the
//! previous valid set, so knowledge accumulates across compiles.
//! [`Engine::predict`] works either way: on a compiled engine it multiplies
//! the valid set with the evidence; otherwise it schedules the whole bag of
//! pending vectors together with the evidence.
//!
//! # Examples
//!
//! ```
//! use vector_logic::Engine;
//!
//! let mut engine = Engine::new(&["x1", "x2", "x3"]).unwrap();
//! engine.add_rule("x1 => x2").unwrap();
//! engine.add_rule("x2 => x3").unwrap();
//! engine.compile();
//!
//! let prediction = engine.predict(&[("x1", true)]).unwrap();
//! assert_eq!(prediction.value("x3").unwrap(), Some(true));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::compiler::{self, IntermediateSizeStats};
use crate::cube::Cube;
use crate::rule::RuleConverter;
use crate::state_vector::StateVector;

pub mod error;
mod prediction;
#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use prediction::Prediction;

/// How a stored state vector entered the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RuleDescriptor {
    /// A rule string passed to `add_rule`
    Rule(Arc<str>),
    /// An evidence assignment, pre-rendered for display
    Evidence(Arc<str>),
    /// A state vector passed in verbatim
    Custom,
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDescriptor::Rule(rule) => f.write_str(rule),
            RuleDescriptor::Evidence(evidence) => write!(f, "evidence: {}", evidence),
            RuleDescriptor::Custom => f.write_str("custom state vector"),
        }
    }
}

/// A propositional inference engine over a fixed set of named variables.
///
/// Construction validates, sorts, and de-duplicates the variable names and
/// assigns each a 1-based index. All rule strings are converted eagerly, so
/// errors surface at `add_rule` time rather than at compile time.
#[derive(Debug)]
pub struct Engine {
    name: Option<Arc<str>>,
    variables: Vec<Arc<str>>,
    variable_map: Arc<BTreeMap<Arc<str>, i32>>,
    converter: RuleConverter,
    uncompiled_rules: Vec<RuleDescriptor>,
    state_vectors: Vec<StateVector>,
    compiled_rules: Vec<RuleDescriptor>,
    valid_set: Option<StateVector>,
    is_compiled: bool,
    intermediate_sizes: Vec<usize>,
}

impl Engine {
    /// Create an engine over the given variables.
    ///
    /// # Errors
    ///
    /// Fails when a variable name is not a valid identifier (a letter or
    /// underscore followed by letters, digits, or underscores, ASCII only).
    ///
    /// # Examples
    ///
    /// ```
    /// use vector_logic::Engine;
    ///
    /// let engine = Engine::new(&["b", "a", "b"]).unwrap();
    /// // Sorted and de-duplicated.
    /// let names: Vec<&str> = engine.variables().iter().map(|v| v.as_ref()).collect();
    /// assert_eq!(names, vec!["a", "b"]);
    ///
    /// assert!(Engine::new(&["1bad"]).is_err());
    /// ```
    pub fn new<S: AsRef<str>>(variables: &[S]) -> Result<Self, EngineError> {
        Self::assemble(variables, None, &[] as &[&str])
    }

    /// Create a named engine over the given variables.
    pub fn with_name<S: AsRef<str>>(variables: &[S], name: &str) -> Result<Self, EngineError> {
        Self::assemble(variables, Some(name), &[] as &[&str])
    }

    /// Create an engine and convert an initial batch of rules.
    pub fn with_rules<S: AsRef<str>, R: AsRef<str>>(
        variables: &[S],
        name: Option<&str>,
        rules: &[R],
    ) -> Result<Self, EngineError> {
        Self::assemble(variables, name, rules)
    }

    fn assemble<S: AsRef<str>, R: AsRef<str>>(
        variables: &[S],
        name: Option<&str>,
        rules: &[R],
    ) -> Result<Self, EngineError> {
        let mut unique: BTreeSet<Arc<str>> = BTreeSet::new();
        for variable in variables {
            let variable = variable.as_ref();
            if !is_conformal(variable) {
                return Err(EngineError::NonConformalName {
                    name: Arc::from(variable),
                });
            }
            unique.insert(Arc::from(variable));
        }

        let sorted: Vec<Arc<str>> = unique.into_iter().collect();
        let variable_map: Arc<BTreeMap<Arc<str>, i32>> = Arc::new(
            sorted
                .iter()
                .enumerate()
                .map(|(position, name)| (Arc::clone(name), position as i32 + 1))
                .collect(),
        );

        let mut engine = Engine {
            name: name.map(Arc::from),
            variables: sorted,
            converter: RuleConverter::new(Arc::clone(&variable_map)),
            variable_map,
            uncompiled_rules: Vec::new(),
            state_vectors: Vec::new(),
            compiled_rules: Vec::new(),
            valid_set: None,
            is_compiled: false,
            intermediate_sizes: Vec::new(),
        };
        for rule in rules {
            engine.add_rule(rule.as_ref())?;
        }
        Ok(engine)
    }

    /// The engine's name, when one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The sorted, de-duplicated variable names, index `i + 1` for
    /// position `i`.
    pub fn variables(&self) -> &[Arc<str>] {
        &self.variables
    }

    /// Descriptors of the rules not yet folded into the valid set.
    pub fn uncompiled_rules(&self) -> Vec<String> {
        self.uncompiled_rules
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Descriptors of the rules already folded into the valid set.
    pub fn compiled_rules(&self) -> Vec<String> {
        self.compiled_rules.iter().map(ToString::to_string).collect()
    }

    /// The state vectors of the not-yet-compiled rules.
    pub fn state_vectors(&self) -> &[StateVector] {
        &self.state_vectors
    }

    /// Whether the valid set reflects every added rule.
    pub fn is_compiled(&self) -> bool {
        self.is_compiled
    }

    /// The compiled valid set, when the engine has ever been compiled.
    pub fn valid_set(&self) -> Option<&StateVector> {
        self.valid_set.as_ref()
    }

    /// Sizes of the intermediate products recorded by the last `compile`.
    pub fn intermediate_sizes(&self) -> &[usize] {
        &self.intermediate_sizes
    }

    /// Summary statistics over [`Engine::intermediate_sizes`].
    pub fn intermediate_size_stats(&self) -> IntermediateSizeStats {
        IntermediateSizeStats::from_sizes(&self.intermediate_sizes)
    }

    /// Convert a rule string and append it to the knowledge base.
    ///
    /// # Errors
    ///
    /// Fails on invalid rule syntax or undefined identifiers.
    pub fn add_rule(&mut self, rule: &str) -> Result<(), EngineError> {
        let state_vector = self.converter.convert(rule)?;
        self.uncompiled_rules.push(RuleDescriptor::Rule(Arc::from(rule)));
        self.state_vectors.push(state_vector);
        self.is_compiled = false;
        Ok(())
    }

    /// Append a piece of evidence: a partial assignment of variables.
    ///
    /// The assignments become a single-cube state vector. Assigning the same
    /// variable both ways yields a null cube, surfacing as a contradiction
    /// on the next compile.
    ///
    /// # Errors
    ///
    /// Fails when an assigned variable is not part of this engine.
    pub fn add_evidence(&mut self, evidence: &[(&str, bool)]) -> Result<(), EngineError> {
        let cube = self.evidence_cube(evidence)?;
        self.uncompiled_rules.push(RuleDescriptor::Evidence(Arc::from(
            format_evidence(evidence).as_str(),
        )));
        self.state_vectors.push(StateVector::new(vec![cube]));
        self.is_compiled = false;
        Ok(())
    }

    /// Append a pre-built state vector verbatim.
    pub fn add_state_vector(&mut self, state_vector: StateVector) {
        self.uncompiled_rules.push(RuleDescriptor::Custom);
        self.state_vectors.push(state_vector);
        self.is_compiled = false;
    }

    /// Fuse the previous valid set and every pending rule into a new valid
    /// set.
    ///
    /// A contradictory rule set produces an empty valid set; check
    /// [`Engine::is_contradiction`]. The multiplication schedule's
    /// intermediate sizes are recorded and available afterwards through
    /// [`Engine::intermediate_sizes`].
    pub fn compile(&mut self) {
        let mut inputs = Vec::with_capacity(self.state_vectors.len() + 1);
        if let Some(valid_set) = self.valid_set.take() {
            inputs.push(valid_set);
        }
        inputs.append(&mut self.state_vectors);

        self.intermediate_sizes.clear();
        let valid_set = compiler::fuse(
            inputs,
            compiler::MAX_CLUSTER_SIZE,
            &mut self.intermediate_sizes,
        );

        self.valid_set = Some(valid_set);
        self.compiled_rules.append(&mut self.uncompiled_rules);
        self.is_compiled = true;
    }

    /// Combine the knowledge base with one piece of evidence.
    ///
    /// On a compiled engine this is a single product with the valid set. On
    /// an uncompiled engine the evidence joins the pending vectors (and any
    /// previous valid set) in a full scheduler run - often faster for
    /// one-off queries, since restrictive evidence shrinks every
    /// intermediate.
    ///
    /// # Errors
    ///
    /// Fails when an assigned variable is not part of this engine.
    pub fn predict(&self, evidence: &[(&str, bool)]) -> Result<Prediction, EngineError> {
        let evidence_sv = StateVector::new(vec![self.evidence_cube(evidence)?]);

        let mut sizes = Vec::new();
        let result = if self.is_compiled {
            match &self.valid_set {
                Some(valid_set) => {
                    let product = valid_set.product(&evidence_sv);
                    sizes.push(product.size());
                    product
                }
                None => evidence_sv,
            }
        } else {
            let mut inputs = Vec::with_capacity(self.state_vectors.len() + 2);
            inputs.push(evidence_sv);
            if let Some(valid_set) = &self.valid_set {
                inputs.push(valid_set.clone());
            }
            inputs.extend(self.state_vectors.iter().cloned());
            compiler::fuse(inputs, compiler::MAX_CLUSTER_SIZE, &mut sizes)
        };

        Ok(Prediction::new(
            result,
            Arc::clone(&self.variable_map),
            sizes,
        ))
    }

    /// The consolidated value of a variable in the compiled valid set.
    ///
    /// # Errors
    ///
    /// Fails when the engine is not compiled, when the name is unknown, and
    /// when the valid set is a contradiction.
    pub fn get_variable_value(&self, name: &str) -> Result<Option<bool>, EngineError> {
        if !self.is_compiled {
            return Err(EngineError::NotCompiled);
        }
        let index = self.index_of(name)?;
        match &self.valid_set {
            Some(valid_set) => Ok(valid_set.var_value(index)?),
            None => Err(EngineError::NotCompiled),
        }
    }

    /// Whether the compiled knowledge base is unsatisfiable.
    pub fn is_contradiction(&self) -> bool {
        self.valid_set
            .as_ref()
            .map_or(false, StateVector::is_contradiction)
    }

    fn index_of(&self, name: &str) -> Result<i32, EngineError> {
        self.variable_map
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownVariable {
                name: Arc::from(name),
            })
    }

    fn evidence_cube(&self, evidence: &[(&str, bool)]) -> Result<Cube, EngineError> {
        let mut ones = BTreeSet::new();
        let mut zeros = BTreeSet::new();
        for (name, value) in evidence {
            let index = self.index_of(name)?;
            if *value {
                ones.insert(index);
            } else {
                zeros.insert(index);
            }
        }
        Ok(Cube::from_sets(ones, zeros))
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => writeln!(f, "====== Engine: {} ======", name)?,
            None => writeln!(f, "====== Engine ======")?,
        }
        writeln!(f, "Variables: {:?}", self.variables)?;

        let width = self.variables.len();
        let mut position = 0;
        for descriptor in &self.compiled_rules {
            position += 1;
            writeln!(f, "{}. Rule:  {} (compiled)", position, descriptor)?;
        }
        for (descriptor, state_vector) in self.uncompiled_rules.iter().zip(&self.state_vectors) {
            position += 1;
            writeln!(f, "{}. Rule:  {}", position, descriptor)?;
            writeln!(f, "{}", state_vector.render(Some(width), 0))?;
        }

        if let Some(valid_set) = &self.valid_set {
            writeln!(f, "Valid set:")?;
            writeln!(f, "{}", valid_set.render(Some(width), 0))?;
        }
        Ok(())
    }
}

/// Variable names: non-empty, ASCII, a letter or underscore followed by
/// letters, digits, or underscores.
fn is_conformal(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Render evidence the way it is stored in the rule descriptors,
/// e.g. `{x1: true, x3: false}`.
fn format_evidence(evidence: &[(&str, bool)]) -> String {
    let assignments: Vec<String> = evidence
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();
    format!("{{{}}}", assignments.join(", "))
}
