//! Pivot-set similarity matrices and cluster selection
//!
//! The compiler orders its multiplications by the overlap between the
//! *pivot sets* of the pending state vectors (the variables each one fixes).
//! This module maintains the pairwise union and intersection size matrices
//! for those pivot sets and picks the next cluster of vectors to multiply by
//! greatest Jaccard similarity.
//!
//! The matrices are built once from a bit-level incidence table (one bitmask
//! per pivot set; intersection sizes by AND + popcount, union sizes by
//! inclusion-exclusion) and then maintained incrementally as the compiler
//! removes multiplied vectors and appends their product.

use std::collections::BTreeSet;

/// A dense symmetric matrix of set-size counts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SquareMatrix {
    n: usize,
    data: Vec<u32>,
}

impl SquareMatrix {
    fn zeros(n: usize) -> Self {
        SquareMatrix {
            n,
            data: vec![0; n * n],
        }
    }

    fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.n + col]
    }

    fn set(&mut self, row: usize, col: usize, value: u32) {
        self.data[row * self.n + col] = value;
    }

    /// Delete one row and the matching column.
    fn remove(&mut self, index: usize) {
        let n = self.n;
        let mut data = Vec::with_capacity((n - 1) * (n - 1));
        for row in 0..n {
            if row == index {
                continue;
            }
            for col in 0..n {
                if col == index {
                    continue;
                }
                data.push(self.get(row, col));
            }
        }
        self.n = n - 1;
        self.data = data;
    }

    /// Grow by one row and column, initialized to zero.
    fn grow(&mut self) {
        let n = self.n;
        let mut data = vec![0; (n + 1) * (n + 1)];
        for row in 0..n {
            for col in 0..n {
                data[row * (n + 1) + col] = self.get(row, col);
            }
        }
        self.n = n + 1;
        self.data = data;
    }
}

/// Pairwise union and intersection sizes over a list of pivot sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimilarityMatrices {
    unions: SquareMatrix,
    intersections: SquareMatrix,
}

impl SimilarityMatrices {
    /// Build both matrices from scratch.
    pub(crate) fn new(pivot_sets: &[BTreeSet<i32>]) -> Self {
        let n = pivot_sets.len();
        let masks: Vec<Vec<u64>> = incidence_masks(pivot_sets);
        let mut unions = SquareMatrix::zeros(n);
        let mut intersections = SquareMatrix::zeros(n);
        for i in 0..n {
            for j in i..n {
                let inter = mask_intersection(&masks[i], &masks[j]);
                let len_i = pivot_sets[i].len() as u32;
                let len_j = pivot_sets[j].len() as u32;
                let union = len_i + len_j - inter;
                intersections.set(i, j, inter);
                intersections.set(j, i, inter);
                unions.set(i, j, union);
                unions.set(j, i, union);
            }
        }
        SimilarityMatrices {
            unions,
            intersections,
        }
    }

    /// Incrementally rebuild after the compiler replaced a cluster.
    ///
    /// `removed` holds the deleted row/column indices in descending order;
    /// `pivot_sets` is the surviving list with the new product's pivot set
    /// appended last. The fresh row and column are computed directly against
    /// the survivors.
    pub(crate) fn remove_and_append(&mut self, removed: &[usize], pivot_sets: &[BTreeSet<i32>]) {
        for &index in removed {
            self.unions.remove(index);
            self.intersections.remove(index);
        }
        self.unions.grow();
        self.intersections.grow();

        let n = pivot_sets.len();
        debug_assert_eq!(self.unions.n, n);
        let appended = &pivot_sets[n - 1];
        for (k, pivots) in pivot_sets.iter().enumerate() {
            let inter = pivots.intersection(appended).count() as u32;
            let union = pivots.union(appended).count() as u32;
            self.intersections.set(k, n - 1, inter);
            self.intersections.set(n - 1, k, inter);
            self.unions.set(k, n - 1, union);
            self.unions.set(n - 1, k, union);
        }
    }

    /// Jaccard similarity between rows `i` and `j`, zero on the diagonal and
    /// for empty unions.
    fn jaccard(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        let union = self.unions.get(i, j);
        if union == 0 {
            return 0.0;
        }
        f64::from(self.intersections.get(i, j)) / f64::from(union)
    }

    #[cfg(test)]
    fn union_rows(&self) -> Vec<Vec<u32>> {
        (0..self.unions.n)
            .map(|i| (0..self.unions.n).map(|j| self.unions.get(i, j)).collect())
            .collect()
    }

    #[cfg(test)]
    fn intersection_rows(&self) -> Vec<Vec<u32>> {
        (0..self.intersections.n)
            .map(|i| {
                (0..self.intersections.n)
                    .map(|j| self.intersections.get(i, j))
                    .collect()
            })
            .collect()
    }
}

/// Pick the indices of the state vectors to multiply next.
///
/// The anchor is the row with the highest squared Jaccard similarity to any
/// other row (ties resolve to the lowest index). Its partners are the other
/// rows in descending Jaccard order, capped at `max_cluster_size - 1`; after
/// the first partner the selection stops at similarity zero.
///
/// When no more than `max_cluster_size` vectors remain, all of them are
/// selected.
pub(crate) fn find_next_cluster(
    matrices: &SimilarityMatrices,
    count: usize,
    max_cluster_size: usize,
) -> Vec<usize> {
    if count <= max_cluster_size {
        return (0..count).collect();
    }

    let mut anchor = 0;
    let mut anchor_score = f64::MIN;
    for row in 0..count {
        let row_best = (0..count)
            .map(|col| matrices.jaccard(row, col))
            .fold(0.0, f64::max);
        let score = row_best * row_best;
        if score > anchor_score {
            anchor_score = score;
            anchor = row;
        }
    }

    let mut partners: Vec<usize> = (0..count).filter(|&idx| idx != anchor).collect();
    partners.sort_by(|&a, &b| {
        matrices
            .jaccard(anchor, b)
            .total_cmp(&matrices.jaccard(anchor, a))
    });

    let mut cluster = vec![anchor];
    for idx in partners {
        let similarity = matrices.jaccard(anchor, idx);
        cluster.push(idx);
        if similarity == 0.0 || cluster.len() == max_cluster_size {
            break;
        }
    }
    cluster
}

/// One bitmask per pivot set over the full index range of all sets.
fn incidence_masks(pivot_sets: &[BTreeSet<i32>]) -> Vec<Vec<u64>> {
    let min_index = pivot_sets
        .iter()
        .filter_map(|set| set.iter().next())
        .min()
        .copied()
        .unwrap_or(0);
    let max_index = pivot_sets
        .iter()
        .filter_map(|set| set.iter().next_back())
        .max()
        .copied()
        .unwrap_or(0);
    let span = (max_index - min_index + 1).max(0) as usize;
    let words = span.div_ceil(64);

    pivot_sets
        .iter()
        .map(|set| {
            let mut mask = vec![0u64; words];
            for &index in set {
                let bit = (index - min_index) as usize;
                mask[bit / 64] |= 1 << (bit % 64);
            }
            mask
        })
        .collect()
}

fn mask_intersection(a: &[u64], b: &[u64]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(lhs, rhs)| (lhs & rhs).count_ones())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pivot_sets() -> Vec<BTreeSet<i32>> {
        vec![
            BTreeSet::from([1, 2, 3]),
            BTreeSet::from([3, 4, 5]),
            BTreeSet::from([1, 4, 5]),
        ]
    }

    #[test]
    fn test_matrices_basic() {
        let matrices = SimilarityMatrices::new(&sample_pivot_sets());
        assert_eq!(
            matrices.intersection_rows(),
            vec![vec![3, 1, 1], vec![1, 3, 2], vec![1, 2, 3]]
        );
        assert_eq!(
            matrices.union_rows(),
            vec![vec![3, 5, 5], vec![5, 3, 4], vec![5, 4, 3]]
        );
    }

    #[test]
    fn test_matrices_disjoint_sets() {
        let pivot_sets = vec![
            BTreeSet::from([1, 2]),
            BTreeSet::from([3, 4]),
            BTreeSet::from([5, 6]),
        ];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        assert_eq!(
            matrices.intersection_rows(),
            vec![vec![2, 0, 0], vec![0, 2, 0], vec![0, 0, 2]]
        );
        assert_eq!(
            matrices.union_rows(),
            vec![vec![2, 4, 4], vec![4, 2, 4], vec![4, 4, 2]]
        );
    }

    #[test]
    fn test_matrices_empty_sets() {
        let pivot_sets = vec![
            BTreeSet::from([1, 2]),
            BTreeSet::new(),
            BTreeSet::from([2, 3]),
        ];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        assert_eq!(
            matrices.union_rows(),
            vec![vec![2, 2, 3], vec![2, 0, 2], vec![3, 2, 2]]
        );
        assert_eq!(
            matrices.intersection_rows(),
            vec![vec![2, 0, 1], vec![0, 0, 0], vec![1, 0, 2]]
        );

        let all_empty = vec![BTreeSet::new(), BTreeSet::new(), BTreeSet::new()];
        let matrices = SimilarityMatrices::new(&all_empty);
        assert_eq!(matrices.union_rows(), vec![vec![0; 3]; 3]);
        assert_eq!(matrices.intersection_rows(), vec![vec![0; 3]; 3]);
    }

    #[test]
    fn test_matrices_negative_indices() {
        let pivot_sets = vec![BTreeSet::from([-1, 2]), BTreeSet::from([-1, 3])];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        assert_eq!(matrices.intersection_rows(), vec![vec![2, 1], vec![1, 2]]);
        assert_eq!(matrices.union_rows(), vec![vec![2, 3], vec![3, 2]]);
    }

    #[test]
    fn test_remove_and_append_matches_fresh_build() {
        let mut pivot_sets = sample_pivot_sets();
        let mut matrices = SimilarityMatrices::new(&pivot_sets);

        // Remove index 1 and append two new pivot sets, one at a time.
        pivot_sets.remove(1);
        pivot_sets.push(BTreeSet::from([2, 3, 6]));
        matrices.remove_and_append(&[1], &pivot_sets);
        assert_eq!(matrices, SimilarityMatrices::new(&pivot_sets));

        pivot_sets.push(BTreeSet::from([1, 6]));
        matrices.remove_and_append(&[], &pivot_sets);
        assert_eq!(matrices, SimilarityMatrices::new(&pivot_sets));
    }

    #[test]
    fn test_remove_all_then_append() {
        let pivot_sets = vec![BTreeSet::from([1, 2]), BTreeSet::from([2, 3])];
        let mut matrices = SimilarityMatrices::new(&pivot_sets);

        let merged = vec![BTreeSet::from([1, 2, 3])];
        matrices.remove_and_append(&[1, 0], &merged);
        assert_eq!(matrices.union_rows(), vec![vec![3]]);
        assert_eq!(matrices.intersection_rows(), vec![vec![3]]);
    }

    #[test]
    fn test_find_next_cluster_small_input() {
        let pivot_sets = vec![BTreeSet::from([1]), BTreeSet::from([2])];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        assert_eq!(find_next_cluster(&matrices, 2, 2), vec![0, 1]);
    }

    #[test]
    fn test_find_next_cluster_picks_best_overlap() {
        // Sets 1 and 2 overlap heavily; set 0 is nearly disjoint from both.
        let pivot_sets = vec![
            BTreeSet::from([7, 8]),
            BTreeSet::from([1, 2, 3]),
            BTreeSet::from([1, 2, 3, 4]),
        ];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        assert_eq!(find_next_cluster(&matrices, 3, 2), vec![1, 2]);
    }

    #[test]
    fn test_find_next_cluster_takes_one_disjoint_partner() {
        let pivot_sets = vec![
            BTreeSet::from([1, 2]),
            BTreeSet::from([3, 4]),
            BTreeSet::from([5, 6]),
        ];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        let cluster = find_next_cluster(&matrices, 3, 2);
        // All similarities are zero; the anchor still takes one partner.
        assert_eq!(cluster.len(), 2);
        assert_eq!(cluster[0], 0);
    }

    #[test]
    fn test_find_next_cluster_larger_cluster() {
        let pivot_sets = vec![
            BTreeSet::from([1, 2, 3]),
            BTreeSet::from([1, 2, 4]),
            BTreeSet::from([1, 2]),
            BTreeSet::from([9]),
        ];
        let matrices = SimilarityMatrices::new(&pivot_sets);
        let cluster = find_next_cluster(&matrices, 4, 3);
        assert_eq!(cluster.len(), 3);
        // The disjoint set is never preferred over overlapping ones.
        assert!(!cluster.contains(&3));
    }
}
