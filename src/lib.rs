//! # vector-logic
//!
//! A symbolic inference engine for propositional logic over a finite set of
//! named Boolean variables.
//!
//! Knowledge is expressed as logical rules (`"sky_is_grey &&
//! humidity_is_high => it_will_rain"`); queries combine those rules with
//! partial evidence to deduce the definite value - true, false, or unknown -
//! of every variable. The representation is algebraic throughout: every
//! rule, every intermediate result, and every answer is a [`StateVector`], a
//! disjunction of ternary [`Cube`]s, and inference is multiplication of
//! state vectors followed by aggressive simplification.
//!
//! ## Building blocks
//!
//! - [`Cube`] - an immutable partial assignment: indices fixed to 1, fixed
//!   to 0, or left as don't care.
//! - [`StateVector`] - a canonical disjunction of cubes with product,
//!   simplification (adjacency reduction, subsumption, deduplication), and
//!   variable elimination.
//! - [`RuleParser`] / [`RuleConverter`] - rule strings to ASTs to state
//!   vectors, flattening nested expressions through auxiliary variables that
//!   are existentially eliminated again.
//! - The compiler - a scheduler that multiplies a bag of state vectors into
//!   one *valid set*, ordering the products by pivot-set similarity to keep
//!   intermediates small.
//! - [`Engine`] - the facade holding the variable table, the rule list, and
//!   the compiled valid set.
//!
//! ## Example
//!
//! ```
//! use vector_logic::Engine;
//!
//! let mut engine = Engine::new(&[
//!     "sky_is_grey",
//!     "humidity_is_high",
//!     "it_will_rain",
//!     "take_umbrella",
//! ])
//! .unwrap();
//!
//! engine.add_rule("sky_is_grey && humidity_is_high => it_will_rain").unwrap();
//! engine.add_rule("it_will_rain => take_umbrella").unwrap();
//! engine.compile();
//!
//! let prediction = engine
//!     .predict(&[("sky_is_grey", true), ("humidity_is_high", true)])
//!     .unwrap();
//! assert_eq!(prediction.value("take_umbrella").unwrap(), Some(true));
//! ```
//!
//! ## Contradictions are results
//!
//! An unsatisfiable rule set or a conflicting piece of evidence never raises
//! an error: it produces an *empty* state vector, inspected through
//! `is_contradiction`. Errors are reserved for actual misuse - malformed
//! rules, unknown variables, queries before compilation.
//!
//! ## Compile or not
//!
//! [`Engine::compile`] fuses all rules once so that every later
//! [`Engine::predict`] is a single product; that is the right trade for
//! repeated queries. A one-off query can skip compilation entirely:
//! `predict` on an uncompiled engine schedules the evidence together with
//! the rules, and restrictive evidence often keeps those intermediates far
//! smaller than the full valid set would be.

mod compiler;
mod cube;
mod engine;
mod rule;
mod state_vector;

pub use compiler::IntermediateSizeStats;
pub use cube::Cube;
pub use engine::{Engine, EngineError, Prediction};
pub use rule::{RuleAst, RuleConverter, RuleError, RuleOp, RuleParser};
pub use state_vector::{StateVector, StateVectorError};
