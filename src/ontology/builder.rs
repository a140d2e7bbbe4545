use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::ontology::termarena::Arena;
use crate::term::{TermGroup, TermId, TermIndex, TermRecord};
use crate::{Ontology, PhenoError, PhenoResult};

/// Builder state: terms are being collected
pub struct LooseCollection;
/// Builder state: all terms are present and linked to their parents
pub struct AllTerms;
/// Builder state: the graph is acyclic and all ancestors are cached
pub struct ConnectedTerms;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        pending_parents: builder.pending_parents,
        state: PhantomData,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Builds an [`Ontology`] step by step
///
/// The builder moves through three states and only the last one can
/// produce an [`Ontology`]. This guarantees that no partially built
/// ontology is ever exposed.
///
/// ```text
/// Builder<LooseCollection>
/// |
/// terms_complete()   resolve parent identifiers
/// |
/// V
/// Builder<AllTerms>
/// |
/// connect_all_terms()   reject cycles, cache ancestors
/// |
/// V
/// Builder<ConnectedTerms>
/// |
/// build()
/// |
/// V
/// Ontology
/// ```
///
/// # Examples
///
/// ```
/// use phenorank::{Builder, TermRecord};
///
/// let mut builder = Builder::new();
/// builder.add_term(TermRecord::new("A", "Root")).unwrap();
/// builder.add_term(TermRecord::new("B", "Child")).unwrap();
///
/// let mut builder = builder.terms_complete().unwrap();
/// builder.add_parent("A", "B").unwrap();
///
/// let ontology = builder.connect_all_terms().unwrap().build();
/// assert_eq!(ontology.len(), 2);
/// assert!(ontology.term("B").unwrap().parents().any(|p| p.id() == "A"));
/// ```
pub struct Builder<T> {
    terms: Arena,
    pending_parents: Vec<(TermIndex, TermId)>,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    /// Constructs an empty builder
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            pending_parents: Vec::new(),
            state: PhantomData,
        }
    }

    /// Adds a term to the ontology
    ///
    /// The parents of the record are only resolved in [`Builder::terms_complete`],
    /// so terms can be added in any order.
    ///
    /// # Errors
    ///
    /// [`PhenoError::MalformedOntology`] if the identifier is empty or was
    /// added before
    pub fn add_term(&mut self, record: TermRecord) -> PhenoResult<()> {
        if record.id.as_str().trim().is_empty() {
            return Err(PhenoError::MalformedOntology(format!(
                "empty identifier for term '{}'",
                record.name
            )));
        }
        let index = self.terms.insert(record.id, record.name)?;
        for parent in record.parents {
            self.pending_parents.push((index, parent));
        }
        Ok(())
    }

    /// Finishes adding terms and links every term to its parents
    ///
    /// # Errors
    ///
    /// [`PhenoError::MalformedOntology`] if a parent identifier does not
    /// refer to a term of the ontology
    pub fn terms_complete(mut self) -> PhenoResult<Builder<AllTerms>> {
        let pending = std::mem::take(&mut self.pending_parents);
        let mut builder: Builder<AllTerms> = transition_state(self);
        for (child, parent) in pending {
            let Some(parent_index) = builder.terms.index_of(parent.as_str()) else {
                let child_id = builder.terms.get_unchecked(child).id();
                return Err(PhenoError::MalformedOntology(format!(
                    "{child_id} refers to unknown parent {parent}"
                )));
            };
            builder.link(parent_index, child);
        }
        Ok(builder)
    }
}

impl Builder<AllTerms> {
    /// Adds a connection from a term to its parent
    ///
    /// # Errors
    ///
    /// [`PhenoError::MalformedOntology`] if either term is not present
    pub fn add_parent<P: AsRef<str>, C: AsRef<str>>(
        &mut self,
        parent_id: P,
        child_id: C,
    ) -> PhenoResult<()> {
        let parent = self.terms.index_of(parent_id.as_ref()).ok_or_else(|| {
            PhenoError::MalformedOntology(format!("unknown parent {}", parent_id.as_ref()))
        })?;
        let child = self.terms.index_of(child_id.as_ref()).ok_or_else(|| {
            PhenoError::MalformedOntology(format!("unknown child {}", child_id.as_ref()))
        })?;
        self.link(parent, child);
        Ok(())
    }

    fn link(&mut self, parent: TermIndex, child: TermIndex) {
        self.terms.get_unchecked_mut(parent).add_child(child);
        self.terms.get_unchecked_mut(child).add_parent(parent);
    }

    /// Verifies that the graph is acyclic and caches all ancestors of every term
    ///
    /// # Errors
    ///
    /// [`PhenoError::MalformedOntology`] if any term is its own ancestor
    pub fn connect_all_terms(mut self) -> PhenoResult<Builder<ConnectedTerms>> {
        self.detect_cycles()?;

        for index in self.terms.keys() {
            if !self.terms.get_unchecked(index).ancestors_cached() {
                self.create_cache_of_ancestors(index);
            }
        }
        debug!("Cached ancestors for {} terms", self.terms.len());
        Ok(transition_state(self))
    }

    /// Depth-first traversal along the parent edges
    ///
    /// A term that is reached again while it is still on the traversal
    /// stack closes a cycle.
    fn detect_cycles(&self) -> PhenoResult<()> {
        let mut visits = vec![Visit::New; self.terms.len()];

        for start in self.terms.keys() {
            if visits[start.as_usize()] != Visit::New {
                continue;
            }
            let mut stack: Vec<(TermIndex, usize)> = vec![(start, 0)];
            visits[start.as_usize()] = Visit::OnStack;

            while let Some(&(current, position)) = stack.last() {
                let next_parent = self.terms.get_unchecked(current).parents().get(position);
                match next_parent {
                    Some(parent) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        match visits[parent.as_usize()] {
                            Visit::OnStack => {
                                let term = self.terms.get_unchecked(parent).id();
                                return Err(PhenoError::MalformedOntology(format!(
                                    "cycle detected: {term} is its own ancestor"
                                )));
                            }
                            Visit::New => {
                                visits[parent.as_usize()] = Visit::OnStack;
                                stack.push((parent, 0));
                            }
                            Visit::Done => {}
                        }
                    }
                    None => {
                        visits[current.as_usize()] = Visit::Done;
                        stack.pop();
                    }
                }
            }
        }
        trace!("No cycles in {} terms", self.terms.len());
        Ok(())
    }

    /// Links a term to all its direct and indirect parents
    ///
    /// The recursion bubbles up to the root terms and caches the
    /// ancestors of every term on the way back down. It stops at terms
    /// that are already cached. The graph must be acyclic.
    fn create_cache_of_ancestors(&mut self, index: TermIndex) {
        let parents = self.terms.get_unchecked(index).parents().clone();
        let mut res = TermGroup::with_capacity(parents.len() + 1);
        res.insert(index);
        for parent in &parents {
            let grandparents = self.all_ancestors(parent);
            res = &res | grandparents;
        }
        self.terms.get_unchecked_mut(index).set_ancestors(res);
    }

    fn all_ancestors(&mut self, index: TermIndex) -> &TermGroup {
        if !self.terms.get_unchecked(index).ancestors_cached() {
            self.create_cache_of_ancestors(index);
        }
        self.terms.get_unchecked(index).ancestors()
    }
}

impl Builder<ConnectedTerms> {
    /// Returns the finished, immutable [`Ontology`]
    pub fn build(self) -> Ontology {
        Ontology::new(self.terms)
    }
}
