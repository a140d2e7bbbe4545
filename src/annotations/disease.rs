use std::borrow::Borrow;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::term::{TermId, TermIndex};

/// A unique identifier for a [`Disease`], e.g. `ORPHA:558` or `OMIM:154700`
///
/// Two `DiseaseId`s are equal if their string representations are
/// byte-wise equal. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiseaseId {
    inner: Arc<str>,
}

impl DiseaseId {
    /// Returns the identifier as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for DiseaseId {
    fn from(s: &str) -> Self {
        Self { inner: s.into() }
    }
}

impl From<String> for DiseaseId {
    fn from(s: String) -> Self {
        Self { inner: s.into() }
    }
}

impl AsRef<str> for DiseaseId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for DiseaseId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for DiseaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiseaseId({self})")
    }
}

impl Display for DiseaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for DiseaseId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for DiseaseId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// A disease as it is provided by a data-loading collaborator
///
/// The terms are not validated until the record is added to an
/// [`crate::annotations::AnnotationIndex`].
///
/// # Examples
///
/// ```
/// use phenorank::annotations::DiseaseRecord;
///
/// let mut record = DiseaseRecord::new("ORPHA:558", "Marfan syndrome");
/// record.add_term("HP:0001166", Some("Very frequent (99-80%)"));
/// record.add_term("HP:0000545", None);
///
/// assert_eq!(record.terms.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseRecord {
    /// Unique identifier
    pub id: DiseaseId,
    /// Display label
    pub name: String,
    /// Annotated terms with an optional categorical frequency label
    pub terms: Vec<(TermId, Option<String>)>,
}

impl DiseaseRecord {
    /// Constructs a record without any terms
    pub fn new<I: Into<DiseaseId>>(id: I, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            terms: Vec::new(),
        }
    }

    /// Annotates the disease with another term
    pub fn add_term<I: Into<TermId>>(&mut self, term: I, frequency: Option<&str>) {
        self.terms
            .push((term.into(), frequency.map(ToString::to_string)));
    }
}

/// A validated link between a [`Disease`] and a term
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    term: TermId,
    index: TermIndex,
    weight: f64,
}

impl Annotation {
    pub(crate) fn new(term: TermId, index: TermIndex, weight: f64) -> Self {
        Self {
            term,
            index,
            weight,
        }
    }

    /// The annotated term
    pub fn term(&self) -> &TermId {
        &self.term
    }

    /// The evidence weight in (0, 1]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub(crate) fn index(&self) -> TermIndex {
        self.index
    }
}

/// A single disease of the annotation index
///
/// A disease has a unique [`DiseaseId`] and a name and is connected to
/// a set of terms. Every term appears at most once.
#[derive(Debug, Clone)]
pub struct Disease {
    id: DiseaseId,
    name: Arc<str>,
    annotations: Vec<Annotation>,
}

impl Disease {
    /// Annotations must be unique per term
    pub(crate) fn new(id: DiseaseId, name: &str, mut annotations: Vec<Annotation>) -> Self {
        annotations.sort_by_key(Annotation::index);
        Self {
            id,
            name: name.into(),
            annotations,
        }
    }

    /// The unique identifier of the disease
    pub fn id(&self) -> &DiseaseId {
        &self.id
    }

    /// The display label of the disease
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// The annotated terms and their evidence weights
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Returns the number of annotated terms
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Returns `true` if the disease is not annotated with any term
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl PartialEq for Disease {
    fn eq(&self, other: &Disease) -> bool {
        self.id == other.id
    }
}

impl Eq for Disease {}
