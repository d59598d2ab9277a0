//! State vectors: canonical disjunctions of ternary cubes
//!
//! A [`StateVector`] represents a propositional formula as a disjunction of
//! [`Cube`]s. Every logical rule converts to a state vector, and inference
//! is multiplication of state vectors (conjunction of disjunctions) followed
//! by simplification.
//!
//! # Canonical form
//!
//! [`StateVector::simplify`] drives a vector toward a canonical cube set:
//!
//! 1. Null cubes are dropped; a trivial cube collapses the whole vector to
//!    `{ trivial }` (logical TRUE).
//! 2. Duplicates are removed.
//! 3. Adjacent cube pairs are reduced to their common remainder, iterating
//!    to a fixed point.
//! 4. Optionally, subsumed cubes (covered by a more general sibling) are
//!    removed.
//!
//! An **empty** vector contains no satisfiable cube and therefore denotes a
//! contradiction; products and simplification surface contradictions as this
//! value rather than as errors.
//!
//! # Examples
//!
//! ```
//! use vector_logic::{Cube, StateVector};
//!
//! // (x1 ∧ x2) ∨ (x1 ∧ !x2) simplifies to x1.
//! let sv = StateVector::new(vec![
//!     Cube::new(&[1, 2], &[]),
//!     Cube::new(&[1], &[2]),
//! ]);
//! let simplified = sv.simplify(None, false);
//! assert_eq!(simplified, StateVector::new(vec![Cube::new(&[1], &[])]));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::cube::Cube;

pub mod error;

pub use error::StateVectorError;

/// A disjunction of cubes, ordered for display but compared as a set.
///
/// State vectors are immutable: every operation returns a new vector.
#[derive(Debug, Clone, Eq)]
pub struct StateVector {
    cubes: Vec<Cube>,
}

impl StateVector {
    /// Create a state vector from the given cubes, preserving their order.
    pub fn new(cubes: Vec<Cube>) -> Self {
        StateVector { cubes }
    }

    /// Create the empty state vector, which represents a contradiction.
    pub fn empty() -> Self {
        StateVector { cubes: Vec::new() }
    }

    /// Create the trivial state vector `{ trivial }`, which represents TRUE.
    pub fn trivial() -> Self {
        StateVector {
            cubes: vec![Cube::trivial()],
        }
    }

    /// The cubes of this vector, in insertion order.
    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    /// Number of cubes in the vector.
    pub fn size(&self) -> usize {
        self.cubes.len()
    }

    /// Whether this vector is a contradiction: it contains no non-null cube.
    pub fn is_contradiction(&self) -> bool {
        self.cubes.iter().all(|cube| cube.is_null())
    }

    /// Whether this vector is trivially true: it contains a trivial cube.
    pub fn is_trivial(&self) -> bool {
        self.cubes.iter().any(|cube| cube.is_trivial())
    }

    /// Union of the pivot sets of all cubes.
    pub fn pivot_set(&self) -> BTreeSet<i32> {
        let mut pivots = BTreeSet::new();
        for cube in &self.cubes {
            pivots.extend(cube.pivot_set());
        }
        pivots
    }

    /// Product of two state vectors: the simplified Cartesian product of
    /// their cubes.
    ///
    /// The product distributes conjunction over the disjunctions, so its raw
    /// size is bounded by `|self| · |other|`; null products are dropped and
    /// the result is simplified (without subsumption reduction). The product
    /// of anything with a contradiction is a contradiction.
    pub fn product(&self, other: &StateVector) -> StateVector {
        let mut cubes = Vec::with_capacity(self.cubes.len() * other.cubes.len());
        for a in &self.cubes {
            for b in &other.cubes {
                let product = a.product(b);
                if !product.is_null() {
                    cubes.push(product);
                }
            }
        }
        StateVector::new(cubes).simplify(None, false)
    }

    /// Canonicalize the cube set.
    ///
    /// Drops null cubes, collapses to `{ trivial }` when a trivial cube is
    /// present, deduplicates, and runs the adjacency-reduction loop to a
    /// fixed point (or at most `max_iterations` passes). With
    /// `reduce_subsumption` set, cubes covered by a more general sibling are
    /// removed afterwards.
    ///
    /// Simplification is idempotent and preserves the set of satisfying
    /// assignments.
    pub fn simplify(&self, max_iterations: Option<usize>, reduce_subsumption: bool) -> StateVector {
        let mut cubes: Vec<Cube> = self
            .cubes
            .iter()
            .filter(|cube| !cube.is_null())
            .cloned()
            .collect();
        if cubes.iter().any(|cube| cube.is_trivial()) {
            return StateVector::trivial();
        }
        cubes = dedup_cubes(cubes);

        let mut iterations = 0;
        loop {
            if max_iterations.is_some_and(|limit| iterations >= limit) {
                break;
            }
            let (next, changed) = reduce_adjacent_pass(cubes);
            cubes = next;
            if !changed {
                break;
            }
            // A reduction of x·c and !x·c can surface the trivial cube.
            if cubes.iter().any(|cube| cube.is_trivial()) {
                return StateVector::trivial();
            }
            cubes = dedup_cubes(cubes);
            iterations += 1;
        }

        if reduce_subsumption {
            cubes = drop_subsumed(cubes);
        }
        StateVector::new(cubes)
    }

    /// Negate the given variables in every cube.
    pub fn negate_variables(&self, indices: &[i32]) -> StateVector {
        StateVector::new(
            self.cubes
                .iter()
                .map(|cube| cube.negate_variables(indices))
                .collect(),
        )
    }

    /// Remove the given variables from every cube.
    ///
    /// Followed by `simplify(None, true)` this is the existential
    /// elimination of those variables.
    pub fn remove_variables(&self, indices: &[i32]) -> StateVector {
        StateVector::new(
            self.cubes
                .iter()
                .map(|cube| cube.remove_variables(indices))
                .collect(),
        )
    }

    /// The consolidated value of a variable across the whole vector.
    ///
    /// Returns `Some(true)` when every non-null cube fixes the index to 1,
    /// `Some(false)` when every non-null cube fixes it to 0, and `None`
    /// otherwise. Null cubes are vacuous and ignored; a trivial cube admits
    /// both values, so its presence makes the result unknown.
    ///
    /// # Errors
    ///
    /// Fails when the vector is a contradiction: no variable has a value in
    /// an unsatisfiable formula.
    pub fn var_value(&self, index: i32) -> Result<Option<bool>, StateVectorError> {
        if self.is_contradiction() {
            return Err(StateVectorError::ContradictionQuery { index });
        }
        let mut consolidated = None;
        for cube in &self.cubes {
            // A null cube covers no assignments and contributes nothing to
            // the disjunction.
            if cube.is_null() {
                continue;
            }
            if cube.is_trivial() {
                return Ok(None);
            }
            let value = cube.var_value(index);
            if value.is_none() {
                return Ok(None);
            }
            match consolidated {
                None => consolidated = Some(value),
                Some(previous) if previous != value => return Ok(None),
                Some(_) => {}
            }
        }
        Ok(consolidated.flatten())
    }

    /// Render the vector as a `{ … }` block of cube lines, or
    /// `{ Contradiction }` when empty.
    ///
    /// All cube lines are padded to `max_index` columns (inferred from the
    /// largest fixed index when `None`); `indent` shifts the whole block
    /// right.
    ///
    /// # Examples
    ///
    /// ```
    /// use vector_logic::{Cube, StateVector};
    ///
    /// let sv = StateVector::new(vec![
    ///     Cube::new(&[1], &[3]),
    ///     Cube::new(&[4], &[]),
    /// ]);
    /// assert_eq!(sv.render(None, 0), "{\n    1 - 0 -\n    - - - 1\n}");
    /// assert_eq!(StateVector::empty().render(None, 0), "{ Contradiction }");
    /// ```
    pub fn render(&self, max_index: Option<usize>, indent: usize) -> String {
        let pad = " ".repeat(indent);
        if self.cubes.is_empty() {
            return format!("{pad}{{ Contradiction }}");
        }
        let effective_max = max_index.unwrap_or_else(|| {
            self.cubes
                .iter()
                .map(|cube| cube.max_index())
                .max()
                .unwrap_or(0)
        });
        let mut lines = Vec::with_capacity(self.cubes.len() + 2);
        lines.push(format!("{pad}{{"));
        for cube in &self.cubes {
            lines.push(format!("{pad}    {}", cube.render(Some(effective_max))));
        }
        lines.push(format!("{pad}}}"));
        lines.join("\n")
    }
}

/// Equality compares the cube sets, ignoring order and multiplicity.
impl PartialEq for StateVector {
    fn eq(&self, other: &Self) -> bool {
        let lhs: BTreeSet<&Cube> = self.cubes.iter().collect();
        let rhs: BTreeSet<&Cube> = other.cubes.iter().collect();
        lhs == rhs
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(None, 0))
    }
}

/// State vector product operator for references: `&a * &b`
impl std::ops::Mul for &StateVector {
    type Output = StateVector;

    fn mul(self, rhs: &StateVector) -> StateVector {
        self.product(rhs)
    }
}

/// State vector product operator: `a * b` (delegates to the reference version)
impl std::ops::Mul for StateVector {
    type Output = StateVector;

    fn mul(self, rhs: StateVector) -> StateVector {
        self.product(&rhs)
    }
}

/// Remove duplicate cubes, keeping first occurrences in order.
fn dedup_cubes(cubes: Vec<Cube>) -> Vec<Cube> {
    let mut seen = HashSet::with_capacity(cubes.len());
    cubes
        .into_iter()
        .filter(|cube| seen.insert(cube.clone()))
        .collect()
}

/// One adjacency-reduction pass: greedily pair up reducible cubes and
/// replace each pair by its reduction. Returns the new cube list and whether
/// any pair was reduced.
fn reduce_adjacent_pass(cubes: Vec<Cube>) -> (Vec<Cube>, bool) {
    let mut used = vec![false; cubes.len()];
    let mut out = Vec::with_capacity(cubes.len());
    let mut changed = false;
    for i in 0..cubes.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut reduced = None;
        for j in (i + 1)..cubes.len() {
            if used[j] {
                continue;
            }
            if let Some(remainder) = cubes[i].reduce(&cubes[j]) {
                used[j] = true;
                reduced = Some(remainder);
                changed = true;
                break;
            }
        }
        out.push(reduced.unwrap_or_else(|| cubes[i].clone()));
    }
    (out, changed)
}

/// Remove every cube covered by a strictly different, more general cube.
/// Assumes the input is deduplicated.
fn drop_subsumed(cubes: Vec<Cube>) -> Vec<Cube> {
    let mut keep = vec![true; cubes.len()];
    for i in 0..cubes.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..cubes.len() {
            if i == j || !keep[j] {
                continue;
            }
            if cubes[i].superset_cmp(&cubes[j]) == Some(std::cmp::Ordering::Greater) {
                keep[j] = false;
            }
        }
    }
    cubes
        .into_iter()
        .zip(keep)
        .filter_map(|(cube, kept)| kept.then_some(cube))
        .collect()
}
