use std::collections::VecDeque;
use std::fmt::Debug;
use std::path::Path;

use tracing::info;

use crate::parser;
use crate::term::{Term, TermGroup, TermIndex, TermInternal, TermRecord, Terms};
use crate::{PhenoError, PhenoResult};

mod builder;
mod termarena;
pub use builder::{AllTerms, Builder, ConnectedTerms, LooseCollection};
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the directed acyclic graph of all phenotype terms
///
/// Terms are connected to each other through `is_a` relationships. Every
/// term except the roots has at least one parent term. The ontology is
/// immutable once built: ancestors of every term are computed once during
/// construction and served from the cache afterwards. Loading a new version
/// of the ontology always creates a new instance.
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ TERM : contains
///     TERM ||--o{ TERM : is_a
///     TERM {
///         TermId id
///         str name
///         Terms parents
///         Terms children
///         Terms ancestors
///     }
/// ```
///
/// # Examples
///
/// ```
/// use phenorank::{Ontology, TermRecord};
///
/// let ontology = Ontology::load(vec![
///     TermRecord::new("HP:0000001", "All"),
///     TermRecord::new("HP:0000118", "Phenotypic abnormality").with_parent("HP:0000001"),
///     TermRecord::new("HP:0000707", "Abnormality of the nervous system").with_parent("HP:0000118"),
/// ]).unwrap();
///
/// assert_eq!(ontology.len(), 3);
/// assert!(ontology.contains("HP:0000707"));
/// assert!(ontology.term("HP:9999999").is_none());
///
/// let term = ontology.term("HP:0000707").unwrap();
/// assert_eq!(term.name(), "Abnormality of the nervous system");
/// assert_eq!(ontology.ancestors_of("HP:0000707").unwrap().count(), 3);
/// assert_eq!(ontology.descendants_of("HP:0000001").unwrap().count(), 3);
/// ```
pub struct Ontology {
    terms: Arena,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ontology with {} terms", self.terms.len())
    }
}

impl Ontology {
    pub(crate) fn new(terms: Arena) -> Self {
        Self { terms }
    }

    /// Builds the ontology from a sequence of term records
    ///
    /// # Errors
    ///
    /// [`PhenoError::MalformedOntology`] if a term is duplicated, a parent
    /// reference points to an unknown term or the `is_a` relations contain
    /// a cycle. No ontology is returned in that case.
    pub fn load<I: IntoIterator<Item = TermRecord>>(records: I) -> PhenoResult<Self> {
        let mut builder = Builder::new();
        for record in records {
            builder.add_term(record)?;
        }
        let ontology = builder.terms_complete()?.connect_all_terms()?.build();
        info!("Loaded ontology with {} terms", ontology.len());
        Ok(ontology)
    }

    /// Reads and builds the ontology from an OBO file
    ///
    /// # Errors
    ///
    /// - [`PhenoError::CannotOpenFile`] if the file cannot be read
    /// - [`PhenoError::MalformedOntology`] see [`Ontology::load`]
    pub fn from_obo<P: AsRef<Path>>(path: P) -> PhenoResult<Self> {
        Self::load(parser::hp_obo::read_obo_file(path)?)
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.terms.len() == 0
    }

    /// Returns `true` if the term exists in the ontology
    pub fn contains<I: AsRef<str>>(&self, id: I) -> bool {
        self.terms.index_of(id.as_ref()).is_some()
    }

    /// Returns the [`Term`] with the given identifier
    pub fn term<I: AsRef<str>>(&self, id: I) -> Option<Term<'_>> {
        self.terms.get(id.as_ref()).map(|term| Term::new(self, term))
    }

    /// Iterates all ancestors of a term, including the term itself
    ///
    /// Root terms only return themselves.
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn ancestors_of<I: AsRef<str>>(&self, id: I) -> PhenoResult<Terms<'_>> {
        Ok(self.checked_term(id.as_ref())?.ancestors())
    }

    /// Iterates all descendants of a term, including the term itself
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn descendants_of<I: AsRef<str>>(&self, id: I) -> PhenoResult<Terms<'_>> {
        let start = self.checked_term(id.as_ref())?.index();

        let mut group = TermGroup::new();
        let mut queue = VecDeque::from([start]);
        group.insert(start);
        while let Some(current) = queue.pop_front() {
            for child in self.get(current).children() {
                if group.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        Ok(Terms::owned(group, self))
    }

    /// Iterates all terms without parents
    pub fn roots(&self) -> impl Iterator<Item = Term<'_>> {
        self.iter().filter(Term::is_root)
    }

    /// Iterates all terms of the ontology
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.terms.values(),
            ontology: self,
        }
    }

    pub(crate) fn checked_term(&self, id: &str) -> PhenoResult<Term<'_>> {
        self.term(id)
            .ok_or_else(|| PhenoError::UnknownTerm(id.to_string()))
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<TermIndex> {
        self.terms.index_of(id)
    }

    pub(crate) fn get(&self, index: TermIndex) -> &TermInternal {
        self.terms.get_unchecked(index)
    }

    pub(crate) fn term_at(&self, index: TermIndex) -> Term<'_> {
        Term::new(self, self.get(index))
    }
}

/// Iterates all [`Term`]s of an [`Ontology`]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, TermInternal>,
    ontology: &'a Ontology,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|term| Term::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = Term<'a>;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
