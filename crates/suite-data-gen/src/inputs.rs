//! Input-space combinators
//!
//! Concrete targets enumerate an explicit, finite parameter space. These
//! helpers build the common shapes of that space in a fixed order.

/// All unordered pairs drawn with replacement from `values`
///
/// Yields `(v0, v0), (v0, v1), …, (v0, vn), (v1, v1), …, (vn, vn)`, so a
/// base set of N values produces N·(N+1)/2 pairs and never both argument
/// orders of the same pair.
#[must_use]
pub fn combination_pairs<T: Clone>(values: &[T]) -> Vec<(T, T)> {
    values
        .iter()
        .enumerate()
        .flat_map(|(i, a)| values[i..].iter().map(move |b| (a.clone(), b.clone())))
        .collect()
}

/// Full Cartesian product of `values` with itself, row-major
#[must_use]
pub fn ordered_pairs<T: Clone>(values: &[T]) -> Vec<(T, T)> {
    values
        .iter()
        .flat_map(|a| values.iter().map(move |b| (a.clone(), b.clone())))
        .collect()
}

/// How the base input set is combined into pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pairing {
    /// Unordered pairs with replacement, for symmetric operations
    #[default]
    Unordered,
    /// Every ordered pair
    Ordered,
}

/// Two-operand parameter space: curated edge-case pairs merged with a
/// combinatorial product of a base set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpace<T> {
    /// Hand-picked pairs, emitted first in the given order
    pub curated: Vec<(T, T)>,
    /// Base values combined according to `pairing`
    pub base: Vec<T>,
    /// Combination rule for the base set
    pub pairing: Pairing,
}

impl<T: Clone + PartialEq> InputSpace<T> {
    /// Create a space over `base` with no curated pairs
    #[must_use]
    pub fn new(base: Vec<T>) -> Self {
        Self {
            curated: Vec::new(),
            base,
            pairing: Pairing::default(),
        }
    }

    /// Set the combination rule
    #[must_use]
    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Set curated pairs
    #[must_use]
    pub fn with_curated(mut self, curated: Vec<(T, T)>) -> Self {
        self.curated = curated;
        self
    }

    /// Enumerate the space
    ///
    /// Curated pairs come first. Product pairs follow, skipping any pair the
    /// curated list already produced (in either order, for unordered
    /// pairing).
    #[must_use]
    pub fn pairs(&self) -> Vec<(T, T)> {
        let product = match self.pairing {
            Pairing::Unordered => combination_pairs(&self.base),
            Pairing::Ordered => ordered_pairs(&self.base),
        };
        let mut out = self.curated.clone();
        out.extend(
            product
                .into_iter()
                .filter(|pair| !self.curated.iter().any(|c| self.same_pair(c, pair))),
        );
        out
    }

    fn same_pair(&self, a: &(T, T), b: &(T, T)) -> bool {
        match self.pairing {
            Pairing::Ordered => a == b,
            Pairing::Unordered => a == b || (a.0 == b.1 && a.1 == b.0),
        }
    }

    /// Number of pairs [`Self::pairs`] yields
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs().len()
    }

    /// Whether the space is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curated.is_empty() && self.base.is_empty()
    }
}
