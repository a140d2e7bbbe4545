use crate::term::{TermGroup, TermId, TermIndex};
use crate::{DEFAULT_NUM_ANCESTORS, DEFAULT_NUM_CHILDREN, DEFAULT_NUM_PARENTS};

/// The owned representation of a term inside the ontology arena
#[derive(Debug)]
pub(crate) struct TermInternal {
    id: TermId,
    index: TermIndex,
    name: String,
    parents: TermGroup,
    children: TermGroup,
    ancestors: TermGroup,
    ancestors_cached: bool,
}

impl TermInternal {
    pub fn new(id: TermId, index: TermIndex, name: String) -> TermInternal {
        TermInternal {
            id,
            index,
            name,
            parents: TermGroup::with_capacity(DEFAULT_NUM_PARENTS),
            children: TermGroup::with_capacity(DEFAULT_NUM_CHILDREN),
            ancestors: TermGroup::with_capacity(DEFAULT_NUM_ANCESTORS),
            ancestors_cached: false,
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn index(&self) -> TermIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &TermGroup {
        &self.parents
    }

    pub fn children(&self) -> &TermGroup {
        &self.children
    }

    /// All ancestors of the term, including the term itself
    ///
    /// Only populated once the ontology is connected
    pub fn ancestors(&self) -> &TermGroup {
        &self.ancestors
    }

    pub fn ancestors_cached(&self) -> bool {
        self.ancestors_cached
    }

    pub fn set_ancestors(&mut self, ancestors: TermGroup) {
        self.ancestors = ancestors;
        self.ancestors_cached = true;
    }

    pub fn add_parent(&mut self, parent: TermIndex) -> bool {
        self.parents.insert(parent)
    }

    pub fn add_child(&mut self, child: TermIndex) -> bool {
        self.children.insert(child)
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TermInternal {}
