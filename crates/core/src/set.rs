//! # Structural Sets and Cartesian Products
//!
//! Option profiles and lenses are composite values without an intrinsic
//! identity: two profiles built independently with the same entries describe
//! the same outcome. `StructuralSet` therefore decides membership with
//! `PartialEq` (a linear scan) rather than hashing or pointer identity.
//!
//! Sets stay small in practice (one entry per optimal deviation), and
//! insertion order is preserved so results are deterministic.

use std::fmt;

/// A finite set with value-equality membership and stable insertion order.
#[derive(Clone)]
pub struct StructuralSet<T> {
    items: Vec<T>,
}

impl<T> StructuralSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Members as a slice, in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Unwrap into a vector, in insertion order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Wrap members that are already pairwise distinct, skipping the
    /// per-insert membership scan. Order is kept.
    ///
    /// Passing duplicates yields a set that reports them twice.
    pub fn from_distinct(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: PartialEq> StructuralSet<T> {
    /// A set with exactly one member.
    pub fn singleton(item: T) -> Self {
        Self { items: vec![item] }
    }

    /// Insert `item` unless an equal value is already present.
    /// Returns whether the set changed.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Structural membership test.
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|member| member == item)
    }

    /// Members of `self` that are also in `other`, in `self`'s order.
    pub fn intersection(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| other.contains(item))
                .cloned()
                .collect(),
        }
    }

    /// Intersect every set in `sets`, folding left to right.
    ///
    /// The intersection of no sets is the empty set.
    pub fn intersection_of_all<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        T: Clone,
    {
        let mut sets = sets.into_iter();
        match sets.next() {
            Some(first) => sets.fold(first, |running, next| running.intersection(&next)),
            None => Self::new(),
        }
    }

    /// Every pair `(a, b)` with `a` from `self` and `b` from `other`.
    ///
    /// Both inputs are already duplicate-free, so the product is too.
    pub fn product<U>(&self, other: &StructuralSet<U>) -> StructuralSet<(T, U)>
    where
        T: Clone,
        U: Clone + PartialEq,
    {
        StructuralSet {
            items: cartesian2(&self.items, &other.items),
        }
    }
}

impl<T> Default for StructuralSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Set equality: same members, regardless of order.
impl<T: PartialEq> PartialEq for StructuralSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items.iter().all(|item| other.contains(item))
    }
}

impl<T: fmt::Debug> fmt::Debug for StructuralSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq> FromIterator<T> for StructuralSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: PartialEq> Extend<T> for StructuralSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T> IntoIterator for StructuralSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a StructuralSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Cartesian Products
// ============================================================================

/// N-ary cartesian product of option lists.
///
/// Ordering is lexicographic in list order: the first list varies slowest,
/// the last list fastest. The product of no lists is a single empty tuple;
/// if any list is empty the product is empty.
///
/// ```rust
/// use open_games_core::cartesian;
///
/// let profiles = cartesian(&[vec!['a', 'b'], vec!['x', 'y']]);
/// assert_eq!(profiles, vec![
///     vec!['a', 'x'], vec!['a', 'y'],
///     vec!['b', 'x'], vec!['b', 'y'],
/// ]);
/// ```
pub fn cartesian<T, L>(lists: &[L]) -> Vec<Vec<T>>
where
    T: Clone,
    L: AsRef<[T]>,
{
    lists.iter().fold(vec![Vec::with_capacity(lists.len())], |prefixes, list| {
        prefixes
            .iter()
            .flat_map(|prefix| {
                list.as_ref().iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

/// Binary cartesian product, first slice varying slowest.
pub fn cartesian2<A: Clone, B: Clone>(left: &[A], right: &[B]) -> Vec<(A, B)> {
    let mut product = Vec::with_capacity(left.len() * right.len());
    for a in left {
        for b in right {
            product.push((a.clone(), b.clone()));
        }
    }
    product
}
