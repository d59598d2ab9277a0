//! Ternary cube type and its primitive operations
//!
//! A **cube** is an immutable partial Boolean assignment: some variable
//! indices are fixed to 1, some to 0, and the rest are "don't care". A cube
//! is the atomic building block of a [`StateVector`](crate::StateVector) -
//! the disjunction of cubes that represents a logical rule.
//!
//! # Encoding
//!
//! A cube stores two disjoint index sets:
//!
//! - `ones` - indices fixed to 1
//! - `zeros` - indices fixed to 0
//!
//! Indices are 1-based. Negative indices are permitted and denote auxiliary
//! variables introduced by the rule converter; they participate identically
//! in every operation.
//!
//! Two cubes are special:
//!
//! - The **trivial** cube fixes nothing and is satisfied by every total
//!   assignment (logical TRUE).
//! - The **null** cube marks a local contradiction (logical FALSE); it
//!   absorbs every product.
//!
//! # Examples
//!
//! ```
//! use vector_logic::Cube;
//!
//! let a = Cube::new(&[1], &[2]);
//! let b = Cube::new(&[3], &[]);
//!
//! // Product is the union of the fixings.
//! let product = &a * &b;
//! assert_eq!(product, Cube::new(&[1, 3], &[2]));
//!
//! // Conflicting fixings produce the null cube.
//! let conflict = &a * &Cube::new(&[2], &[]);
//! assert!(conflict.is_null());
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;


/// An immutable ternary partial assignment (1, 0, or don't care per index).
///
/// Constructed via [`Cube::new`], [`Cube::null`] or [`Cube::trivial`];
/// every operation returns a new cube. Equality and hashing are structural
/// over `(is_null, ones, zeros)`; all null cubes compare equal because
/// construction canonicalizes them to empty index sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    ones: BTreeSet<i32>,
    zeros: BTreeSet<i32>,
    is_null: bool,
}

impl Cube {
    /// Create a cube fixing `ones` to 1 and `zeros` to 0.
    ///
    /// Overlapping sets describe an unsatisfiable assignment, so the result
    /// canonicalizes to the null cube.
    ///
    /// # Examples
    ///
    /// ```
    /// use vector_logic::Cube;
    ///
    /// let cube = Cube::new(&[1, 3], &[2]);
    /// assert!(!cube.is_null());
    ///
    /// let null = Cube::new(&[1], &[1]);
    /// assert!(null.is_null());
    /// ```
    pub fn new(ones: &[i32], zeros: &[i32]) -> Self {
        Self::from_sets(ones.iter().copied().collect(), zeros.iter().copied().collect())
    }

    /// Create the null cube (a local contradiction).
    pub fn null() -> Self {
        Cube {
            ones: BTreeSet::new(),
            zeros: BTreeSet::new(),
            is_null: true,
        }
    }

    /// Create the trivial cube, which fixes nothing and is always satisfied.
    pub fn trivial() -> Self {
        Cube {
            ones: BTreeSet::new(),
            zeros: BTreeSet::new(),
            is_null: false,
        }
    }

    /// Internal constructor from already-built sets, canonicalizing overlap
    /// to the null cube.
    pub(crate) fn from_sets(ones: BTreeSet<i32>, zeros: BTreeSet<i32>) -> Self {
        if !ones.is_disjoint(&zeros) {
            return Cube::null();
        }
        Cube {
            ones,
            zeros,
            is_null: false,
        }
    }

    /// Indices fixed to 1.
    pub fn ones(&self) -> &BTreeSet<i32> {
        &self.ones
    }

    /// Indices fixed to 0.
    pub fn zeros(&self) -> &BTreeSet<i32> {
        &self.zeros
    }

    /// Whether this cube is the null cube (a contradiction).
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Whether this cube is the trivial cube (fixes nothing, always true).
    pub fn is_trivial(&self) -> bool {
        !self.is_null && self.ones.is_empty() && self.zeros.is_empty()
    }

    /// The set of fixed indices: `ones ∪ zeros`. Empty for the null cube.
    pub fn pivot_set(&self) -> BTreeSet<i32> {
        self.ones.union(&self.zeros).copied().collect()
    }

    /// The value this cube fixes `index` to: `Some(true)` for 1,
    /// `Some(false)` for 0, `None` for don't care.
    pub fn var_value(&self, index: i32) -> Option<bool> {
        if self.ones.contains(&index) {
            Some(true)
        } else if self.zeros.contains(&index) {
            Some(false)
        } else {
            None
        }
    }

    /// Product of two cubes: the union of their fixings.
    ///
    /// Null absorbs, and conflicting fixings yield the null cube. The
    /// trivial cube is the neutral element.
    pub fn product(&self, other: &Cube) -> Cube {
        if self.is_null || other.is_null {
            return Cube::null();
        }
        let ones: BTreeSet<i32> = self.ones.union(&other.ones).copied().collect();
        let zeros: BTreeSet<i32> = self.zeros.union(&other.zeros).copied().collect();
        Cube::from_sets(ones, zeros)
    }

    /// Return a cube with every index in `indices` swapped between the ones
    /// and zeros sets. Indices fixed by neither set are untouched; the null
    /// cube stays null.
    pub fn negate_variables(&self, indices: &[i32]) -> Cube {
        if self.is_null {
            return Cube::null();
        }
        let flip: BTreeSet<i32> = indices.iter().copied().collect();
        let ones: BTreeSet<i32> = self
            .ones
            .difference(&flip)
            .chain(self.zeros.intersection(&flip))
            .copied()
            .collect();
        let zeros: BTreeSet<i32> = self
            .zeros
            .difference(&flip)
            .chain(self.ones.intersection(&flip))
            .copied()
            .collect();
        Cube::from_sets(ones, zeros)
    }

    /// Return a cube with every index in `indices` dropped from both sets.
    pub fn remove_variables(&self, indices: &[i32]) -> Cube {
        if self.is_null {
            return Cube::null();
        }
        let drop: BTreeSet<i32> = indices.iter().copied().collect();
        Cube {
            ones: self.ones.difference(&drop).copied().collect(),
            zeros: self.zeros.difference(&drop).copied().collect(),
            is_null: false,
        }
    }

    /// Reduce two adjacent cubes to their common remainder.
    ///
    /// Two cubes are *adjacent* when exactly one index is fixed to 1 in one
    /// and 0 in the other, and every other fixing is identical. The
    /// reduction drops that index entirely: `x·c ∨ !x·c = c`.
    ///
    /// Returns `None` when the cubes are not adjacent.
    pub fn reduce(&self, other: &Cube) -> Option<Cube> {
        if self.is_null || other.is_null {
            return None;
        }

        // Cheap size pre-check: the ones counts must differ by exactly one,
        // with the zeros counts differing by one in the opposite direction.
        let ones_diff = self.ones.len() as isize - other.ones.len() as isize;
        let zeros_diff = self.zeros.len() as isize - other.zeros.len() as isize;
        if ones_diff.abs() != 1 || zeros_diff != -ones_diff {
            return None;
        }

        let ones_sym: BTreeSet<i32> = self.ones.symmetric_difference(&other.ones).copied().collect();
        if ones_sym.len() != 1 {
            return None;
        }
        let zeros_sym: BTreeSet<i32> = self.zeros.symmetric_difference(&other.zeros).copied().collect();
        if ones_sym != zeros_sym {
            return None;
        }

        let swapped = *ones_sym.iter().next()?;
        // The remainder keeps the smaller side of each set, which excludes
        // the swapped index from both.
        let (ones, zeros) = if self.ones.contains(&swapped) {
            (other.ones.clone(), self.zeros.clone())
        } else {
            (self.ones.clone(), other.zeros.clone())
        };
        Some(Cube::from_sets(ones, zeros))
    }

    /// Compare two cubes by generality.
    ///
    /// A cube is a superset of another when it has the same or fewer
    /// fixings, so it is satisfied by every assignment satisfying the other.
    ///
    /// - `Some(Ordering::Greater)` - `self` is more general than `other`, or
    ///   equal to it
    /// - `Some(Ordering::Less)` - `other` is more general than `self`
    /// - `None` - neither contains the other
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use vector_logic::Cube;
    ///
    /// let general = Cube::new(&[1], &[3]);
    /// let specific = Cube::new(&[1, 2], &[3, 4]);
    /// assert_eq!(general.superset_cmp(&specific), Some(Ordering::Greater));
    /// assert_eq!(specific.superset_cmp(&general), Some(Ordering::Less));
    /// assert_eq!(general.superset_cmp(&general), Some(Ordering::Greater));
    /// ```
    pub fn superset_cmp(&self, other: &Cube) -> Option<Ordering> {
        if self.ones.is_subset(&other.ones) && self.zeros.is_subset(&other.zeros) {
            return Some(Ordering::Greater);
        }
        if other.ones.is_subset(&self.ones) && other.zeros.is_subset(&self.zeros) {
            return Some(Ordering::Less);
        }
        None
    }

    /// Render the cube as space-separated `-`/`0`/`1` cells over indices
    /// `1..=max_index`. `None` infers the largest index present.
    ///
    /// The null cube renders as `null`, the trivial cube as `---`, and each
    /// auxiliary (negative) index appends a `*` cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use vector_logic::Cube;
    ///
    /// assert_eq!(Cube::new(&[1, 4], &[3]).render(None), "1 - 0 1");
    /// assert_eq!(Cube::new(&[2], &[5]).render(Some(6)), "- 1 - - 0 -");
    /// assert_eq!(Cube::null().render(None), "null");
    /// assert_eq!(Cube::trivial().render(None), "---");
    /// ```
    pub fn render(&self, max_index: Option<usize>) -> String {
        if self.is_null {
            return "null".to_string();
        }
        if self.is_trivial() {
            return "---".to_string();
        }

        let effective_max = max_index.unwrap_or_else(|| self.max_index());
        let mut cells: Vec<&str> = vec!["-"; effective_max];
        let mut aux = 0usize;
        for (set, mark) in [(&self.ones, "1"), (&self.zeros, "0")] {
            for &i in set.iter() {
                if i >= 1 && (i as usize) <= effective_max {
                    cells[i as usize - 1] = mark;
                } else if i < 1 {
                    aux += 1;
                }
            }
        }
        cells.extend(std::iter::repeat("*").take(aux));
        cells.join(" ")
    }

    /// Largest positive fixed index, or 0 when none is fixed.
    pub(crate) fn max_index(&self) -> usize {
        self.pivot_set().iter().max().copied().unwrap_or(0).max(0) as usize
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::trivial()
    }
}

/// Canonical ordering: null cubes sort before all others, then
/// lexicographically by the ones set and the zeros set.
impl Ord for Cube {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_null, other.is_null) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .ones
                .cmp(&other.ones)
                .then_with(|| self.zeros.cmp(&other.zeros)),
        }
    }
}

impl PartialOrd for Cube {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(None))
    }
}

/// Cube product operator for references: `&a * &b`
impl std::ops::Mul for &Cube {
    type Output = Cube;

    fn mul(self, rhs: &Cube) -> Cube {
        self.product(rhs)
    }
}

/// Cube product operator: `a * b` (delegates to the reference version)
impl std::ops::Mul for Cube {
    type Output = Cube;

    fn mul(self, rhs: Cube) -> Cube {
        self.product(&rhs)
    }
}
