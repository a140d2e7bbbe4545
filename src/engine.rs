use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::annotations::{AnnotationConfig, DiseaseRecord, LoadReport};
use crate::extract::TermExtractor;
use crate::{PhenoResult, Ranking, Snapshot, TermRecord};

/// Serves ranking queries against the current [`Snapshot`]
///
/// Every query captures the snapshot that is current when it starts and
/// runs entirely against it. Refreshing the data builds a new snapshot
/// first and then swaps it in for all subsequent queries. Queries that
/// are in flight during a swap finish on their old snapshot.
///
/// The lock is only held to clone or replace the `Arc` of the snapshot,
/// never during a ranking.
///
/// # Examples
///
/// ```
/// use phenorank::{Engine, TermRecord};
/// use phenorank::annotations::{AnnotationConfig, DiseaseRecord};
///
/// let terms = vec![
///     TermRecord::new("A", "Root"),
///     TermRecord::new("B", "Middle").with_parent("A"),
///     TermRecord::new("C", "Leaf").with_parent("B"),
/// ];
/// let mut d1 = DiseaseRecord::new("D1", "Leaf disease");
/// d1.add_term("C", None);
/// let mut d2 = DiseaseRecord::new("D2", "Middle disease");
/// d2.add_term("B", None);
///
/// let config = AnnotationConfig::default();
/// let (engine, _) = Engine::load(terms, vec![d1, d2], &config).unwrap();
/// assert_eq!(engine.rank(["C"], 0.2).unwrap().best().unwrap().id(), "D1");
///
/// // Replace the annotations, only `D3` is left
/// let mut d3 = DiseaseRecord::new("D3", "Another leaf disease");
/// d3.add_term("C", None);
/// engine.refresh_annotations(vec![d3], &config);
/// assert_eq!(engine.rank(["C"], 0.2).unwrap().best().unwrap().id(), "D3");
/// ```
#[derive(Debug)]
pub struct Engine {
    current: RwLock<Arc<Snapshot>>,
}

impl Engine {
    /// Creates an engine serving the given snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Builds the initial snapshot and an engine serving it
    ///
    /// # Errors
    ///
    /// [`crate::PhenoError::MalformedOntology`] if the ontology is invalid.
    /// No engine is created in that case.
    pub fn load<T, D>(
        terms: T,
        diseases: D,
        config: &AnnotationConfig,
    ) -> PhenoResult<(Self, LoadReport)>
    where
        T: IntoIterator<Item = TermRecord>,
        D: IntoIterator<Item = DiseaseRecord>,
    {
        let (snapshot, report) = Snapshot::build(terms, diseases, config)?;
        Ok((Self::new(snapshot), report))
    }

    /// Captures the current snapshot
    ///
    /// The returned snapshot stays valid and unchanged, even if the
    /// engine swaps in a new one.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Ranks all diseases of the current snapshot against the query terms
    ///
    /// See [`Snapshot::rank`]
    ///
    /// # Errors
    ///
    /// - [`crate::PhenoError::UnknownTerm`] if a query term is not part of the ontology
    /// - [`crate::PhenoError::InvalidInput`] if `threshold` is NaN
    pub fn rank<I>(&self, query: I, threshold: f64) -> PhenoResult<Ranking>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.snapshot().rank(query, threshold)
    }

    /// Extracts the terms from free text and ranks all diseases against them
    ///
    /// # Errors
    ///
    /// - [`crate::PhenoError::UnknownTerm`] if the extractor returns a term that is not part of the ontology
    /// - [`crate::PhenoError::InvalidInput`] if `threshold` is NaN
    pub fn rank_text<E: TermExtractor + ?Sized>(
        &self,
        extractor: &E,
        text: &str,
        threshold: f64,
    ) -> PhenoResult<Ranking> {
        let terms = extractor.extract(text);
        debug!("Extracted {} terms from text", terms.len());
        self.rank(&terms, threshold)
    }

    /// Swaps in a new snapshot and returns the previous one
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let previous = match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, snapshot),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), snapshot),
        };
        info!("Swapped in new snapshot");
        previous
    }

    /// Rebuilds the annotations against the current ontology and swaps them in
    pub fn refresh_annotations<D: IntoIterator<Item = DiseaseRecord>>(
        &self,
        diseases: D,
        config: &AnnotationConfig,
    ) -> LoadReport {
        let ontology = self.snapshot().shared_ontology();
        let (snapshot, report) = Snapshot::from_ontology(ontology, diseases, config);
        self.replace(snapshot);
        report
    }

    /// Rebuilds ontology and annotations and swaps them in
    ///
    /// # Errors
    ///
    /// [`crate::PhenoError::MalformedOntology`] if the new ontology is invalid.
    /// The current snapshot stays active in that case.
    pub fn refresh<T, D>(
        &self,
        terms: T,
        diseases: D,
        config: &AnnotationConfig,
    ) -> PhenoResult<LoadReport>
    where
        T: IntoIterator<Item = TermRecord>,
        D: IntoIterator<Item = DiseaseRecord>,
    {
        let (snapshot, report) = Snapshot::build(terms, diseases, config)?;
        self.replace(snapshot);
        Ok(report)
    }
}
