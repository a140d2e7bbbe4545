//! Diseases are linked to terms of the ontology and make up the annotations
//!
//! This module contains the input records provided by data-loading
//! collaborators ([`DiseaseRecord`]), the validated [`Disease`]s and the
//! [`AnnotationIndex`] that aggregates how often every term is annotated.
//!
//! The underlying principle is:
//! - Each disease has a unique identifier and a display label
//! - Each disease holds the terms it is annotated with, together with an
//!   evidence weight derived from an optional frequency label
//! - Annotating a disease with a term implicitly annotates it with all
//!   ancestors of that term as well
//!
//! Loading annotations never fails as a whole. Invalid entries are skipped
//! and recorded in the [`LoadReport`].

mod config;
mod disease;
mod index;

pub use config::{AnnotationConfig, EvidenceMode, FrequencyTable};
pub use disease::{Annotation, Disease, DiseaseId, DiseaseRecord};
pub use index::{AnnotationIndex, DataQualityIssue, LoadReport};
