//! Turn free text into a set of term identifiers
//!
//! The ranking consumes a set of [`TermId`]s. Producing them from a
//! clinical description is the job of a [`TermExtractor`]. This module
//! provides a [`DictionaryExtractor`] that looks for the exact names and
//! synonyms of terms inside the text. It does not understand language,
//! negations or typos.
//!
//! Every function `Fn(&str) -> TermIds` is a [`TermExtractor`] as well.
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace};

use crate::parser::term_names;
use crate::{Ontology, PhenoResult, TermId, TermIds};

/// Produces the query terms from free text
pub trait TermExtractor {
    /// Returns all terms found in `text`
    fn extract(&self, text: &str) -> TermIds;
}

impl<F> TermExtractor for F
where
    F: Fn(&str) -> TermIds,
{
    fn extract(&self, text: &str) -> TermIds {
        self(text)
    }
}

/// Finds terms by exact, case-insensitive substring matches of their names and synonyms
///
/// # Examples
///
/// ```
/// use phenorank::extract::{DictionaryExtractor, TermExtractor};
///
/// let mut extractor = DictionaryExtractor::new();
/// extractor.add_name("HP:0001250", "Seizure");
/// extractor.add_synonym("Fits", "HP:0001250");
/// extractor.add_name("HP:0000505", "Visual impairment");
///
/// let terms = extractor.extract("Recurrent fits and visual impairment since birth");
/// let ids: Vec<&str> = terms.iter().map(|t| t.as_str()).collect();
/// assert_eq!(ids, vec!["HP:0000505", "HP:0001250"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct DictionaryExtractor {
    names: HashMap<String, TermId>,
    synonyms: HashMap<String, TermId>,
}

impl DictionaryExtractor {
    /// Constructs an empty extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the names of all terms of the ontology
    pub fn from_ontology(ontology: &Ontology) -> Self {
        let mut extractor = Self::new();
        for term in ontology {
            extractor.add_name(term.id().clone(), term.name());
        }
        extractor
    }

    /// Reads the term names (`id<TAB>name`) and synonyms (`synonym<TAB>id`) from files
    ///
    /// # Errors
    ///
    /// [`crate::PhenoError::CannotOpenFile`] if one of the files can't be read
    pub fn from_files<P, Q>(names: P, synonyms: Q) -> PhenoResult<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let mut extractor = Self::new();
        for (id, name) in term_names::read_term_names(names)? {
            extractor.add_name(id, &name);
        }
        for (synonym, id) in term_names::read_synonyms(synonyms)? {
            extractor.add_synonym(&synonym, id);
        }
        debug!(
            "Loaded {} names and {} synonyms",
            extractor.names.len(),
            extractor.synonyms.len()
        );
        Ok(extractor)
    }

    /// Adds the name of a term
    ///
    /// A later name with the same spelling replaces the term of an earlier one.
    pub fn add_name<I: Into<TermId>>(&mut self, id: I, name: &str) {
        if let Some(phrase) = phrase(name) {
            self.names.insert(phrase, id.into());
        }
    }

    /// Adds a synonym of a term
    ///
    /// A later synonym with the same spelling replaces the term of an earlier one.
    pub fn add_synonym<I: Into<TermId>>(&mut self, synonym: &str, id: I) {
        if let Some(phrase) = phrase(synonym) {
            self.synonyms.insert(phrase, id.into());
        }
    }

    /// Returns the number of names and synonyms
    pub fn len(&self) -> usize {
        self.names.len() + self.synonyms.len()
    }

    /// Returns `true` if the extractor does not know any name or synonym
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.synonyms.is_empty()
    }
}

impl TermExtractor for DictionaryExtractor {
    fn extract(&self, text: &str) -> TermIds {
        let text = text.to_lowercase();
        let mut terms = TermIds::new();
        for (phrase, id) in self.names.iter().chain(self.synonyms.iter()) {
            if text.contains(phrase.as_str()) {
                trace!("Found '{phrase}' ({id})");
                terms.insert(id.clone());
            }
        }
        terms
    }
}

/// Lowercased and trimmed, `None` if nothing is left
fn phrase(s: &str) -> Option<String> {
    let phrase = s.trim().to_lowercase();
    if phrase.is_empty() {
        None
    } else {
        Some(phrase)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures;

    #[test]
    fn case_insensitive() {
        let mut extractor = DictionaryExtractor::new();
        extractor.add_name("HP:0001250", "Seizure");
        let terms = extractor.extract("SEIZURES since age 3");
        assert!(terms.contains("HP:0001250"));
    }

    #[test]
    fn names_and_synonyms_share_the_result() {
        let mut extractor = DictionaryExtractor::new();
        extractor.add_name("HP:0001250", "Seizure");
        extractor.add_synonym("Epileptic seizure", "HP:0001250");
        let terms = extractor.extract("Epileptic seizure");
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn no_match() {
        let mut extractor = DictionaryExtractor::new();
        extractor.add_name("HP:0001250", "Seizure");
        assert!(extractor.extract("Short stature").is_empty());
        assert!(extractor.extract("").is_empty());
    }

    #[test]
    fn empty_phrases_are_ignored() {
        let mut extractor = DictionaryExtractor::new();
        extractor.add_name("HP:0000001", "");
        extractor.add_synonym("   ", "HP:0000001");
        assert!(extractor.is_empty());
        assert!(extractor.extract("anything").is_empty());
    }

    #[test]
    fn from_ontology() {
        let extractor = DictionaryExtractor::from_ontology(&fixtures::nervous_system_ontology());
        assert_eq!(extractor.len(), 9);
        let terms = extractor.extract("Patient with focal-onset seizure");
        let ids: Vec<&str> = terms.iter().map(TermId::as_str).collect();
        assert_eq!(ids, vec!["HP:0001250", "HP:0007359"]);
    }

    #[test]
    fn from_files() {
        let extractor =
            DictionaryExtractor::from_files("tests/data/term_names.txt", "tests/data/synonyms.txt")
                .expect("files exist");
        assert!(!extractor.is_empty());
        let terms = extractor.extract("Recurrent fits and poor vision");
        assert!(terms.contains("HP:0001250"));
        assert!(terms.contains("HP:0000505"));
    }

    #[test]
    fn missing_file() {
        assert!(
            DictionaryExtractor::from_files("tests/data/missing.txt", "tests/data/synonyms.txt")
                .is_err()
        );
    }
}
