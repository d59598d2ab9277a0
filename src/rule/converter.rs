//! Conversion of rule strings into state vectors
//!
//! The converter drives the whole pipeline from rule text to algebra:
//!
//! 1. Parse the rule into a [`RuleAst`].
//! 2. Replace every repeated variable occurrence with a fresh auxiliary
//!    variable plus an equality constraint. A naive flattening of a rule
//!    like `x && x` would otherwise produce wrong triplets.
//! 3. Flatten the AST into *simple* rules: a lone variable, a binary rule
//!    over two variables, or a triplet `x = (a op b)`. Every intermediate
//!    operation node gets its own auxiliary variable.
//! 4. Translate each simple rule through the canonical cube tables, applying
//!    negation flags via variable negation.
//! 5. Multiply all the resulting vectors together.
//! 6. Existentially eliminate the auxiliary variables, projecting the result
//!    onto the engine's own variables.
//!
//! Auxiliary variables use negative indices (`-1, -2, …`), keeping them
//! disjoint from the 1-based engine variables inside the same index space.
//! Converter state resets on every call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::cube::Cube;
use crate::state_vector::StateVector;

use super::ast::{RuleAst, RuleOp};
use super::error::RuleError;
use super::parser::RuleParser;

/// Converts rule strings into state vectors over the engine's variables.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use vector_logic::{Cube, RuleConverter, StateVector};
///
/// let map: BTreeMap<Arc<str>, i32> = [(Arc::from("x1"), 1), (Arc::from("x2"), 2)]
///     .into_iter()
///     .collect();
/// let mut converter = RuleConverter::new(Arc::new(map));
///
/// let sv = converter.convert("x1 => x2").unwrap();
/// let expected = StateVector::new(vec![
///     Cube::new(&[1, 2], &[]),
///     Cube::new(&[], &[1]),
/// ]);
/// assert_eq!(sv, expected);
/// ```
#[derive(Debug, Clone)]
pub struct RuleConverter {
    variable_map: Arc<BTreeMap<Arc<str>, i32>>,
    parser: RuleParser,
    aux_counter: i32,
    aux_map: BTreeMap<Arc<str>, i32>,
    // Kept after each conversion for inspection.
    simple_rules: Vec<RuleAst>,
}

impl RuleConverter {
    /// Create a converter over the given variable map.
    pub fn new(variable_map: Arc<BTreeMap<Arc<str>, i32>>) -> Self {
        let parser = RuleParser::new(Arc::clone(&variable_map));
        RuleConverter {
            variable_map,
            parser,
            aux_counter: 0,
            aux_map: BTreeMap::new(),
            simple_rules: Vec::new(),
        }
    }

    /// Convert a rule string into a state vector, with every auxiliary
    /// variable already eliminated.
    ///
    /// # Errors
    ///
    /// Fails on invalid rule syntax or undefined identifiers; see
    /// [`RuleError`].
    pub fn convert(&mut self, rule: &str) -> Result<StateVector, RuleError> {
        self.aux_counter = 0;
        self.aux_map.clear();
        self.simple_rules.clear();

        let ast = self.parser.parse(rule)?;

        let mut equalities = Vec::new();
        let mut seen = BTreeSet::new();
        let ast = self.replace_repeated_variables(&ast, &mut seen, &mut equalities);

        let mut simple = self.flatten(ast);
        simple.append(&mut equalities);
        self.simple_rules = simple;

        let mut combined: Option<StateVector> = None;
        for simple_ast in &self.simple_rules {
            let sv = self.translate(simple_ast)?;
            combined = Some(match combined {
                Some(accumulated) => accumulated.product(&sv),
                None => sv,
            });
        }
        let mut combined = combined.unwrap_or_else(StateVector::trivial);

        if !self.aux_map.is_empty() {
            let aux_indices: Vec<i32> = self.aux_map.values().copied().collect();
            combined = combined
                .remove_variables(&aux_indices)
                .simplify(None, true);
        }
        Ok(combined)
    }

    /// The auxiliary variables allocated by the last conversion.
    pub(crate) fn aux_assignments(&self) -> &BTreeMap<Arc<str>, i32> {
        &self.aux_map
    }

    /// The simple rules produced by the last conversion, flattened rules
    /// first, then the emitted equality constraints.
    pub(crate) fn simple_rules(&self) -> &[RuleAst] {
        &self.simple_rules
    }

    /// Allocate the next auxiliary variable and register its negative index.
    fn fresh_aux(&mut self) -> Arc<str> {
        self.aux_counter += 1;
        let name: Arc<str> = Arc::from(format!("__aux_{}", self.aux_counter).as_str());
        self.aux_map.insert(Arc::clone(&name), -self.aux_counter);
        name
    }

    /// Rebuild the AST, swapping each repeated variable occurrence for a
    /// fresh auxiliary that carries the occurrence's negation flag, and
    /// emitting the equality `original = aux`.
    fn replace_repeated_variables(
        &mut self,
        node: &RuleAst,
        seen: &mut BTreeSet<Arc<str>>,
        equalities: &mut Vec<RuleAst>,
    ) -> RuleAst {
        match node {
            RuleAst::Var { negated, name } => {
                if seen.insert(Arc::clone(name)) {
                    node.clone()
                } else {
                    let aux = self.fresh_aux();
                    equalities.push(RuleAst::op(
                        RuleOp::Equiv,
                        RuleAst::var(false, Arc::clone(name)),
                        RuleAst::var(false, Arc::clone(&aux)),
                    ));
                    RuleAst::var(*negated, aux)
                }
            }
            RuleAst::Op { op, left, right } => {
                let left = self.replace_repeated_variables(left, seen, equalities);
                let right = self.replace_repeated_variables(right, seen, equalities);
                RuleAst::op(*op, left, right)
            }
        }
    }

    /// Decompose an AST into simple rules. Already-simple shapes pass
    /// through without allocating auxiliaries.
    fn flatten(&mut self, ast: RuleAst) -> Vec<RuleAst> {
        if is_simple(&ast) {
            return vec![ast];
        }
        let mut simple = Vec::new();
        let root = self.flatten_recursive(&ast, &mut simple, true);
        simple.push(root);
        simple
    }

    /// Post-order flattening: each non-root operation node becomes
    /// `aux = (left op right)` and is represented upwards by `aux`.
    fn flatten_recursive(
        &mut self,
        node: &RuleAst,
        simple: &mut Vec<RuleAst>,
        is_root: bool,
    ) -> RuleAst {
        let RuleAst::Op { op, left, right } = node else {
            return node.clone();
        };
        let left_repr = self.flatten_recursive(left, simple, false);
        let right_repr = self.flatten_recursive(right, simple, false);
        let current = RuleAst::op(*op, left_repr, right_repr);
        if is_root {
            return current;
        }

        let aux = self.fresh_aux();
        let aux_node = RuleAst::var(false, aux);
        simple.push(RuleAst::op(RuleOp::Equiv, aux_node.clone(), current));
        aux_node
    }

    /// Translate one simple rule through the canonical cube tables.
    fn translate(&self, node: &RuleAst) -> Result<StateVector, RuleError> {
        match node {
            RuleAst::Var { negated, name } => {
                let index = self.index_of(name)?;
                let cube = if *negated {
                    Cube::new(&[], &[index])
                } else {
                    Cube::new(&[index], &[])
                };
                Ok(StateVector::new(vec![cube]))
            }
            RuleAst::Op { op, left, right } => self.translate_op(*op, left, right),
        }
    }

    fn translate_op(
        &self,
        op: RuleOp,
        left: &RuleAst,
        right: &RuleAst,
    ) -> Result<StateVector, RuleError> {
        // Binary rule over two variables.
        if let (Some((left_neg, left_name)), Some((right_neg, right_name))) =
            (left.as_var(), right.as_var())
        {
            let i = self.index_of(left_name)?;
            let j = self.index_of(right_name)?;
            let mut negate = Vec::new();
            if left_neg {
                negate.push(i);
            }
            if right_neg {
                negate.push(j);
            }
            return Ok(binary_rule(op, i, j).negate_variables(&negate));
        }

        // Triplet rule `x = (a op b)`, in either order.
        if op == RuleOp::Equiv {
            let (single, triplet) = if right.is_var() {
                (right, left)
            } else {
                (left, right)
            };
            if let (
                Some((single_neg, single_name)),
                RuleAst::Op {
                    op: inner_op,
                    left: inner_left,
                    right: inner_right,
                },
            ) = (single.as_var(), triplet)
            {
                if let (Some((a_neg, a_name)), Some((b_neg, b_name))) =
                    (inner_left.as_var(), inner_right.as_var())
                {
                    let x = self.index_of(single_name)?;
                    let a = self.index_of(a_name)?;
                    let b = self.index_of(b_name)?;
                    let mut negate = Vec::new();
                    if single_neg {
                        negate.push(x);
                    }
                    if a_neg {
                        negate.push(a);
                    }
                    if b_neg {
                        negate.push(b);
                    }
                    return Ok(triplet_rule(*inner_op, x, a, b).negate_variables(&negate));
                }
            }
        }

        unreachable!("flattening produces only simple rules")
    }

    /// Resolve a name against the engine variables and the auxiliary map.
    fn index_of(&self, name: &str) -> Result<i32, RuleError> {
        self.variable_map
            .get(name)
            .or_else(|| self.aux_map.get(name))
            .copied()
            .ok_or_else(|| RuleError::UndefinedVariable {
                name: Arc::from(name),
            })
    }
}

/// Whether an AST is already one of the simple shapes: a variable, a binary
/// rule over two variables, or an equivalence between a variable and a
/// two-variable operation.
fn is_simple(ast: &RuleAst) -> bool {
    match ast {
        RuleAst::Var { .. } => true,
        RuleAst::Op { op, left, right } => {
            (left.is_var() && right.is_var())
                || (*op == RuleOp::Equiv
                    && ((left.is_var() && is_binary_of_vars(right))
                        || (right.is_var() && is_binary_of_vars(left))))
        }
    }
}

fn is_binary_of_vars(ast: &RuleAst) -> bool {
    matches!(ast, RuleAst::Op { left, right, .. } if left.is_var() && right.is_var())
}

/// Canonical cube set for a binary rule `i op j`.
fn binary_rule(op: RuleOp, i: i32, j: i32) -> StateVector {
    let cubes = match op {
        RuleOp::And => vec![Cube::new(&[i, j], &[])],
        RuleOp::Or => vec![Cube::new(&[i], &[]), Cube::new(&[j], &[i])],
        RuleOp::Xor => vec![Cube::new(&[i], &[j]), Cube::new(&[j], &[i])],
        RuleOp::Implies => vec![Cube::new(&[i, j], &[]), Cube::new(&[], &[i])],
        RuleOp::ImpliedBy => vec![Cube::new(&[i], &[]), Cube::new(&[], &[i, j])],
        RuleOp::Equiv => vec![Cube::new(&[i, j], &[]), Cube::new(&[], &[i, j])],
    };
    StateVector::new(cubes)
}

/// Canonical cube set for a triplet rule `x = (a op b)`.
fn triplet_rule(op: RuleOp, x: i32, a: i32, b: i32) -> StateVector {
    let cubes = match op {
        RuleOp::And => vec![
            Cube::new(&[x, a, b], &[]),
            Cube::new(&[], &[x, a]),
            Cube::new(&[a], &[x, b]),
        ],
        RuleOp::Or => vec![
            Cube::new(&[x, a], &[]),
            Cube::new(&[x, b], &[a]),
            Cube::new(&[], &[x, a, b]),
        ],
        RuleOp::Xor => vec![
            Cube::new(&[x, a], &[b]),
            Cube::new(&[x, b], &[a]),
            Cube::new(&[], &[x, a, b]),
            Cube::new(&[a, b], &[x]),
        ],
        RuleOp::Implies => vec![
            Cube::new(&[x, a, b], &[]),
            Cube::new(&[x], &[a]),
            Cube::new(&[a], &[x, b]),
        ],
        RuleOp::ImpliedBy => vec![
            Cube::new(&[x, a], &[]),
            Cube::new(&[x], &[a, b]),
            Cube::new(&[b], &[x, a]),
        ],
        RuleOp::Equiv => vec![
            Cube::new(&[x, a, b], &[]),
            Cube::new(&[x], &[a, b]),
            Cube::new(&[a], &[x, b]),
            Cube::new(&[b], &[x, a]),
        ],
    };
    StateVector::new(cubes)
}
