//! Rank candidate diseases against a patient's phenotype terms
//!
//! `phenorank` builds an immutable [`Snapshot`] from a phenotype ontology
//! and a set of disease annotations. The snapshot derives an
//! information content (IC) weight for every term from how often diseases
//! are annotated with it (or any of its descendants) and scores a query
//! set of terms against every disease.
//!
//! The ranking returns every disease ordered by score together with a
//! flag that indicates whether the best match is weak enough to suggest a
//! rare or novel condition.
//!
//! # Examples
//!
//! ```
//! use phenorank::{Snapshot, TermRecord};
//! use phenorank::annotations::{AnnotationConfig, DiseaseRecord};
//!
//! let terms = vec![
//!     TermRecord::new("HP:0000001", "All"),
//!     TermRecord::new("HP:0000002", "Abnormality").with_parent("HP:0000001"),
//!     TermRecord::new("HP:0000003", "Specific abnormality").with_parent("HP:0000002"),
//! ];
//!
//! let mut d1 = DiseaseRecord::new("ORPHA:1", "Specific disease");
//! d1.add_term("HP:0000003", None);
//! let mut d2 = DiseaseRecord::new("ORPHA:2", "Generic disease");
//! d2.add_term("HP:0000002", None);
//!
//! let (snapshot, report) = Snapshot::build(terms, vec![d1, d2], &AnnotationConfig::default()).unwrap();
//! assert!(report.is_clean());
//!
//! let ranking = snapshot.rank(["HP:0000003"], 0.2).unwrap();
//! assert_eq!(ranking.best().unwrap().id(), "ORPHA:1");
//! assert!(!ranking.is_rare());
//! ```
use thiserror::Error;

pub mod annotations;
mod engine;
pub mod extract;
mod information_content;
mod ontology;
pub mod parser;
mod ranking;
pub mod similarity;
mod snapshot;
pub mod term;

#[cfg(test)]
pub(crate) mod fixtures;

pub use engine::Engine;
pub use information_content::InformationContent;
pub use ontology::{AllTerms, Builder, ConnectedTerms, LooseCollection, Ontology};
pub use ranking::{RankedDisease, Ranking};
pub use snapshot::Snapshot;
pub use term::{Term, TermId, TermIds, TermRecord, Terms};

const DEFAULT_NUM_PARENTS: usize = 10;
const DEFAULT_NUM_CHILDREN: usize = 10;
const DEFAULT_NUM_ANCESTORS: usize = 30;

/// Errors of the `phenorank` crate
#[derive(Error, Debug, PartialEq)]
pub enum PhenoError {
    /// The ontology contains a cycle, a dangling parent reference or an invalid term
    #[error("malformed ontology: {0}")]
    MalformedOntology(String),
    /// The term does not exist in the ontology
    #[error("term does not exist: {0}")]
    UnknownTerm(String),
    /// The disease does not exist in the annotation index
    #[error("disease does not exist: {0}")]
    UnknownDisease(String),
    /// The file is not present or can't be read
    #[error("unable to open file {0}")]
    CannotOpenFile(String),
    /// Input data could not be parsed
    #[error("invalid data: {0}")]
    InvalidInput(String),
    /// A configured frequency weight is not within (0, 1]
    #[error("invalid weight {weight} for frequency label '{label}'")]
    InvalidFrequencyWeight {
        /// The frequency label
        label: String,
        /// The rejected weight
        weight: f64,
    },
}

impl From<serde_json::Error> for PhenoError {
    fn from(err: serde_json::Error) -> Self {
        PhenoError::InvalidInput(err.to_string())
    }
}

impl From<std::io::Error> for PhenoError {
    fn from(err: std::io::Error) -> Self {
        PhenoError::CannotOpenFile(err.to_string())
    }
}

/// Shortcut for `Result<T, PhenoError>`
pub type PhenoResult<T> = Result<T, PhenoError>;
