//! The compiler: fusing a bag of state vectors into one
//!
//! Compilation multiplies every pending rule vector (plus the previous valid
//! set, if any) into a single vector characterizing all satisfying
//! assignments of the knowledge base. The product is associative, so the
//! result does not depend on the multiplication order - but the size of the
//! intermediates does, dramatically. The scheduler therefore picks at each
//! step the small cluster of vectors whose pivot sets overlap most (see
//! [`similarity`]): shared variables eliminate inconsistent cube products
//! immediately and open adjacency reductions, keeping the working set small
//! where naive left-to-right multiplication explodes.
//!
//! The only failure mode is a logical contradiction, and it is a *result*:
//! the scheduler returns the empty state vector as soon as one appears.
//! Resource exhaustion is not handled here; the recorded intermediate sizes
//! let callers impose their own limits.

use std::collections::BTreeSet;
use std::fmt;

use crate::state_vector::StateVector;

pub(crate) mod similarity;

use similarity::{find_next_cluster, SimilarityMatrices};

/// The canonical cluster size: multiply one pair of vectors per step.
pub(crate) const MAX_CLUSTER_SIZE: usize = 2;

/// Multiply all `state_vectors` into a single vector, recording the size of
/// every intermediate product in `sizes`.
///
/// Trivial vectors are identities and are dropped up front; an input or
/// intermediate contradiction short-circuits to the empty vector. When
/// nothing is left to multiply the result is the trivial vector.
pub(crate) fn fuse(
    mut state_vectors: Vec<StateVector>,
    max_cluster_size: usize,
    sizes: &mut Vec<usize>,
) -> StateVector {
    state_vectors.retain(|sv| !sv.is_trivial());
    if state_vectors.iter().any(|sv| sv.is_contradiction()) {
        return StateVector::empty();
    }
    if state_vectors.is_empty() {
        return StateVector::trivial();
    }

    let mut pivot_sets: Vec<BTreeSet<i32>> =
        state_vectors.iter().map(|sv| sv.pivot_set()).collect();
    let mut matrices = SimilarityMatrices::new(&pivot_sets);

    while state_vectors.len() > 1 {
        let mut cluster = find_next_cluster(&matrices, state_vectors.len(), max_cluster_size);

        let mut product = state_vectors[cluster[0]].clone();
        for &index in &cluster[1..] {
            product = product.product(&state_vectors[index]);
        }
        sizes.push(product.size());

        let product = product.simplify(None, true);
        if product.is_contradiction() {
            return StateVector::empty();
        }

        cluster.sort_unstable_by(|a, b| b.cmp(a));
        for &index in &cluster {
            state_vectors.remove(index);
            pivot_sets.remove(index);
        }
        pivot_sets.push(product.pivot_set());
        state_vectors.push(product);
        matrices.remove_and_append(&cluster, &pivot_sets);
    }

    match state_vectors.pop() {
        Some(valid_set) => valid_set,
        None => StateVector::trivial(),
    }
}

/// Summary statistics over the intermediate product sizes of a compile run.
///
/// Exposed by [`Engine::intermediate_size_stats`](crate::Engine::intermediate_size_stats)
/// so callers can judge how hard a compilation worked without any logging
/// inside the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntermediateSizeStats {
    /// Number of recorded intermediate products
    pub num_entries: usize,
    /// Smallest intermediate size
    pub min: usize,
    /// Largest intermediate size
    pub max: usize,
    /// Arithmetic mean of the sizes
    pub mean: f64,
    /// Root mean square of the sizes, emphasizing the blow-ups
    pub rms: f64,
}

impl IntermediateSizeStats {
    /// Summarize a recorded size sequence. All fields are zero for an empty
    /// sequence.
    pub fn from_sizes(sizes: &[usize]) -> Self {
        if sizes.is_empty() {
            return IntermediateSizeStats {
                num_entries: 0,
                min: 0,
                max: 0,
                mean: 0.0,
                rms: 0.0,
            };
        }
        let num_entries = sizes.len();
        let min = sizes.iter().copied().min().unwrap_or(0);
        let max = sizes.iter().copied().max().unwrap_or(0);
        let sum: usize = sizes.iter().sum();
        let sum_squares: f64 = sizes.iter().map(|&s| (s as f64) * (s as f64)).sum();
        IntermediateSizeStats {
            num_entries,
            min,
            max,
            mean: sum as f64 / num_entries as f64,
            rms: (sum_squares / num_entries as f64).sqrt(),
        }
    }
}

impl fmt::Display for IntermediateSizeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "num_entries: {}, min: {}, mean: {:.1}, rms: {:.1}, max: {}",
            self.num_entries, self.min, self.mean, self.rms, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;

    fn implication(antecedent: i32, consequent: i32) -> StateVector {
        StateVector::new(vec![
            Cube::new(&[antecedent, consequent], &[]),
            Cube::new(&[], &[antecedent]),
        ])
    }

    #[test]
    fn test_fuse_empty_input() {
        let mut sizes = Vec::new();
        let result = fuse(Vec::new(), MAX_CLUSTER_SIZE, &mut sizes);
        assert!(result.is_trivial());
        assert!(sizes.is_empty());
    }

    #[test]
    fn test_fuse_single_vector() {
        let mut sizes = Vec::new();
        let sv = implication(1, 2);
        let result = fuse(vec![sv.clone()], MAX_CLUSTER_SIZE, &mut sizes);
        assert_eq!(result, sv);
        assert!(sizes.is_empty());
    }

    #[test]
    fn test_fuse_chained_implications() {
        let mut sizes = Vec::new();
        let result = fuse(
            vec![implication(1, 2), implication(2, 3)],
            MAX_CLUSTER_SIZE,
            &mut sizes,
        );
        let expected = StateVector::new(vec![
            Cube::new(&[], &[1, 2]),
            Cube::new(&[2, 3], &[]),
        ]);
        assert_eq!(result, expected);
        assert_eq!(sizes.len(), 1);
    }

    #[test]
    fn test_fuse_drops_trivial_inputs() {
        let mut sizes = Vec::new();
        let with_trivial = fuse(
            vec![implication(1, 2), StateVector::trivial(), implication(2, 3)],
            MAX_CLUSTER_SIZE,
            &mut sizes,
        );
        let mut baseline_sizes = Vec::new();
        let baseline = fuse(
            vec![implication(1, 2), implication(2, 3)],
            MAX_CLUSTER_SIZE,
            &mut baseline_sizes,
        );
        assert_eq!(with_trivial, baseline);
    }

    #[test]
    fn test_fuse_input_contradiction() {
        let mut sizes = Vec::new();
        let result = fuse(
            vec![implication(1, 2), StateVector::empty()],
            MAX_CLUSTER_SIZE,
            &mut sizes,
        );
        assert!(result.is_contradiction());
        assert!(sizes.is_empty());
    }

    #[test]
    fn test_fuse_derived_contradiction() {
        // x1 and !x1 multiply to nothing.
        let mut sizes = Vec::new();
        let result = fuse(
            vec![
                StateVector::new(vec![Cube::new(&[1], &[])]),
                StateVector::new(vec![Cube::new(&[], &[1])]),
            ],
            MAX_CLUSTER_SIZE,
            &mut sizes,
        );
        assert!(result.is_contradiction());
        assert_eq!(sizes, vec![0]);
    }

    /// Semantic equality over all assignments of variables `1..=num_vars`:
    /// the cube sets of two valid fusions may differ, the covered
    /// assignments may not.
    fn same_assignments(a: &StateVector, b: &StateVector, num_vars: i32) -> bool {
        (0..1u32 << num_vars).all(|assignment| {
            let satisfied = |sv: &StateVector| {
                sv.cubes().iter().any(|cube| {
                    !cube.is_null()
                        && (1..=num_vars).all(|index| match cube.var_value(index) {
                            Some(value) => value == ((assignment >> (index - 1)) & 1 == 1),
                            None => true,
                        })
                })
            };
            satisfied(a) == satisfied(b)
        })
    }

    #[test]
    fn test_fuse_order_independent_result() {
        let inputs = vec![implication(1, 2), implication(2, 3), implication(3, 4)];
        let mut reversed = inputs.clone();
        reversed.reverse();

        let mut sizes_a = Vec::new();
        let mut sizes_b = Vec::new();
        let forward = fuse(inputs, MAX_CLUSTER_SIZE, &mut sizes_a);
        let backward = fuse(reversed, MAX_CLUSTER_SIZE, &mut sizes_b);
        assert!(same_assignments(&forward, &backward, 4));
    }

    #[test]
    fn test_fuse_larger_cluster_same_result() {
        let inputs = vec![implication(1, 2), implication(2, 3), implication(3, 4)];
        let mut sizes_pairs = Vec::new();
        let mut sizes_triples = Vec::new();
        let pairs = fuse(inputs.clone(), 2, &mut sizes_pairs);
        let triples = fuse(inputs, 3, &mut sizes_triples);
        assert!(same_assignments(&pairs, &triples, 4));
    }

    #[test]
    fn test_intermediate_size_stats() {
        let stats = IntermediateSizeStats::from_sizes(&[2, 4, 4, 6]);
        assert_eq!(stats.num_entries, 4);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 6);
        assert!((stats.mean - 4.0).abs() < 1e-9);
        assert!((stats.rms - 4.242_640_687).abs() < 1e-6);

        let rendered = stats.to_string();
        assert!(rendered.contains("num_entries: 4"));
        assert!(rendered.contains("max: 6"));

        let empty = IntermediateSizeStats::from_sizes(&[]);
        assert_eq!(empty.num_entries, 0);
        assert_eq!(empty.mean, 0.0);
    }
}
