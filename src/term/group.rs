use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::{PhenoError, PhenoResult};

/// Position of a term inside the arena of its [`crate::Ontology`]
///
/// Indices are only meaningful within the ontology that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TermIndex(u32);

impl TermIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for TermIndex {
    type Error = PhenoError;
    fn try_from(n: usize) -> PhenoResult<Self> {
        u32::try_from(n).map(TermIndex).map_err(|_| {
            PhenoError::MalformedOntology(format!("too many terms in ontology: {n}"))
        })
    }
}

/// A set of [`TermIndex`] representing a group of terms
///
/// Each term can occur only once in the group. The indices are kept
/// sorted, so membership checks and intersections are logarithmic or
/// linear instead of quadratic.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TermGroup {
    ids: SmallVec<[TermIndex; 30]>,
}

impl TermGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermIndex`] to the group
    ///
    /// Returns whether the index was newly inserted.
    pub fn insert(&mut self, id: TermIndex) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    pub fn contains(&self, id: &TermIndex) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    pub fn get(&self, index: usize) -> Option<TermIndex> {
        self.ids.get(index).copied()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, TermIndex>> {
        self.ids.iter().copied()
    }

    /// Iterates the indices present in both groups, in ascending order
    pub fn intersection<'a>(&'a self, other: &'a TermGroup) -> Intersection<'a> {
        Intersection {
            left: &self.ids,
            right: &other.ids,
        }
    }
}

impl FromIterator<TermIndex> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermIndex>>(iter: T) -> Self {
        let mut ids: SmallVec<[TermIndex; 30]> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = TermIndex;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, TermIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sorted-merge iterator over two [`TermGroup`]s
pub(crate) struct Intersection<'a> {
    left: &'a [TermIndex],
    right: &'a [TermIndex],
}

impl Iterator for Intersection<'_> {
    type Item = TermIndex;
    fn next(&mut self) -> Option<TermIndex> {
        loop {
            let (left, right) = (self.left, self.right);
            let (a, b) = (left.first()?, right.first()?);
            match a.cmp(b) {
                std::cmp::Ordering::Less => self.left = &left[1..],
                std::cmp::Ordering::Greater => self.right = &right[1..],
                std::cmp::Ordering::Equal => {
                    self.left = &left[1..];
                    self.right = &right[1..];
                    return Some(*a);
                }
            }
        }
    }
}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len() + rhs.len());
        let (mut left, mut right) = (self.ids.as_slice(), rhs.ids.as_slice());
        while let (Some(a), Some(b)) = (left.first(), right.first()) {
            match a.cmp(b) {
                std::cmp::Ordering::Less => {
                    group.ids.push(*a);
                    left = &left[1..];
                }
                std::cmp::Ordering::Greater => {
                    group.ids.push(*b);
                    right = &right[1..];
                }
                std::cmp::Ordering::Equal => {
                    group.ids.push(*a);
                    left = &left[1..];
                    right = &right[1..];
                }
            }
        }
        group.ids.extend_from_slice(left);
        group.ids.extend_from_slice(right);
        group
    }
}

impl BitAnd for &TermGroup {
    type Output = TermGroup;

    fn bitand(self, rhs: &TermGroup) -> TermGroup {
        TermGroup {
            ids: self.intersection(rhs).collect(),
        }
    }
}
