use std::collections::HashMap;

use crate::term::{TermId, TermIndex, TermInternal};
use crate::{PhenoError, PhenoResult};

/// Owns all terms of the ontology
///
/// Terms are stored contiguously and addressed by their [`TermIndex`].
/// The identifier lookup maps the external [`TermId`] to the index.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    terms: Vec<TermInternal>,
    ids: HashMap<TermId, TermIndex>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Creates a new term and returns its index
    ///
    /// Fails if a term with the same identifier is already present
    pub fn insert(&mut self, id: TermId, name: String) -> PhenoResult<TermIndex> {
        if self.ids.contains_key(&id) {
            return Err(PhenoError::MalformedOntology(format!(
                "duplicate term identifier {id}"
            )));
        }
        let index = TermIndex::try_from(self.terms.len())?;
        self.ids.insert(id.clone(), index);
        self.terms.push(TermInternal::new(id, index, name));
        Ok(index)
    }

    pub fn index_of(&self, id: &str) -> Option<TermIndex> {
        self.ids.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&TermInternal> {
        self.index_of(id).map(|index| self.get_unchecked(index))
    }

    /// # Panics
    ///
    /// If the index was not created by this arena
    pub fn get_unchecked(&self, index: TermIndex) -> &TermInternal {
        &self.terms[index.as_usize()]
    }

    /// # Panics
    ///
    /// If the index was not created by this arena
    pub fn get_unchecked_mut(&mut self, index: TermIndex) -> &mut TermInternal {
        &mut self.terms[index.as_usize()]
    }

    pub fn values(&self) -> std::slice::Iter<'_, TermInternal> {
        self.terms.iter()
    }

    pub fn keys(&self) -> Vec<TermIndex> {
        self.terms.iter().map(TermInternal::index).collect()
    }
}
