//! Terms are the nodes of the phenotype ontology
//!
//! Every term has a stable [`TermId`], a display name and is connected
//! to its parent terms through `is_a` relationships. [`Term`] is a cheap
//! read-only view into a term of an [`Ontology`].
use std::borrow::Cow;
use std::fmt::Debug;

use crate::Ontology;

mod group;
mod internal;
mod termid;

pub(crate) use group::{TermGroup, TermIndex};
pub(crate) use internal::TermInternal;
pub use termid::{TermId, TermIds};

/// A single term as it is provided by a data-loading collaborator
///
/// Parent references are resolved only when the [`Ontology`] is built.
///
/// # Examples
///
/// ```
/// use phenorank::TermRecord;
///
/// let record = TermRecord::new("HP:0001250", "Seizure")
///     .with_parent("HP:0012638");
///
/// assert_eq!(record.id, "HP:0001250");
/// assert_eq!(record.parents.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecord {
    /// Stable identifier of the term
    pub id: TermId,
    /// Display name
    pub name: String,
    /// Identifiers of the immediate `is_a` parents
    pub parents: Vec<TermId>,
}

impl TermRecord {
    /// Constructs a new record without any parents
    pub fn new<I: Into<TermId>>(id: I, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            parents: Vec::new(),
        }
    }

    /// Adds an `is_a` parent to the record
    #[must_use]
    pub fn with_parent<I: Into<TermId>>(mut self, parent: I) -> Self {
        self.parents.push(parent.into());
        self
    }
}

/// A term of the [`Ontology`]
///
/// The struct only holds references into the ontology and is cheap
/// to create and copy.
#[derive(Clone, Copy)]
pub struct Term<'a> {
    inner: &'a TermInternal,
    ontology: &'a Ontology,
}

impl<'a> Term<'a> {
    pub(crate) fn new(ontology: &'a Ontology, inner: &'a TermInternal) -> Term<'a> {
        Term { inner, ontology }
    }

    /// The stable identifier of the term
    pub fn id(&self) -> &'a TermId {
        self.inner.id()
    }

    /// The display name of the term
    pub fn name(&self) -> &'a str {
        self.inner.name()
    }

    /// Returns `true` if the term does not have any parents
    pub fn is_root(&self) -> bool {
        self.inner.parents().is_empty()
    }

    /// Iterates the direct parents of the term
    pub fn parents(&self) -> Terms<'a> {
        Terms::borrowed(self.inner.parents(), self.ontology)
    }

    /// Iterates the direct children of the term
    pub fn children(&self) -> Terms<'a> {
        Terms::borrowed(self.inner.children(), self.ontology)
    }

    /// Iterates all ancestors of the term, including the term itself
    ///
    /// # Examples
    ///
    /// ```
    /// use phenorank::{Ontology, TermRecord};
    ///
    /// let ontology = Ontology::load(vec![
    ///     TermRecord::new("A", "Root"),
    ///     TermRecord::new("B", "Middle").with_parent("A"),
    ///     TermRecord::new("C", "Leaf").with_parent("B"),
    /// ]).unwrap();
    ///
    /// let leaf = ontology.term("C").unwrap();
    /// let mut ids: Vec<&str> = leaf.ancestors().map(|t| t.id().as_str()).collect();
    /// ids.sort();
    /// assert_eq!(ids, vec!["A", "B", "C"]);
    /// ```
    pub fn ancestors(&self) -> Terms<'a> {
        Terms::borrowed(self.inner.ancestors(), self.ontology)
    }

    /// Returns `true` if `other` is an ancestor of the term or the term itself
    pub fn is_a(&self, other: &Term) -> bool {
        self.inner.ancestors().contains(&other.index())
    }

    pub(crate) fn index(&self) -> TermIndex {
        self.inner.index()
    }

    pub(crate) fn ancestor_ids(&self) -> &'a TermGroup {
        self.inner.ancestors()
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id() == other.inner.id()
    }
}

impl Eq for Term<'_> {}

impl Debug for Term<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Term({} | {})", self.id(), self.name())
    }
}

/// Iterates [`Term`]s of an [`Ontology`]
///
/// The iterator either borrows the underlying group of terms from the
/// ontology or owns a group that was computed on demand.
pub struct Terms<'a> {
    group: Cow<'a, TermGroup>,
    ontology: &'a Ontology,
    idx: usize,
}

impl<'a> Terms<'a> {
    pub(crate) fn borrowed(group: &'a TermGroup, ontology: &'a Ontology) -> Self {
        Self {
            group: Cow::Borrowed(group),
            ontology,
            idx: 0,
        }
    }

    pub(crate) fn owned(group: TermGroup, ontology: &'a Ontology) -> Self {
        Self {
            group: Cow::Owned(group),
            ontology,
            idx: 0,
        }
    }
}

impl<'a> Iterator for Terms<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.group.get(self.idx)?;
        self.idx += 1;
        Some(Term::new(self.ontology, self.ontology.get(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.group.len() - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Terms<'_> {}

impl Debug for Terms<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Terms({} remaining)", self.group.len() - self.idx)
    }
}
