use std::sync::Arc;

use tracing::info;

use crate::annotations::{AnnotationConfig, AnnotationIndex, DiseaseRecord, LoadReport};
use crate::ranking;
use crate::similarity::{Resnik, Similarity};
use crate::term::TermGroup;
use crate::{InformationContent, Ontology, PhenoError, PhenoResult, Ranking, TermRecord};

/// An immutable, consistent set of ontology, annotations and information content
///
/// All three parts are built together and never change afterwards. A
/// snapshot can be shared between threads and queried concurrently
/// without any locking. Data refreshes build a new snapshot, see
/// [`crate::Engine`].
///
/// # Examples
///
/// ```
/// use phenorank::{Snapshot, TermRecord};
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
/// d2.add_term("X", None);
///
/// let (snapshot, report) = Snapshot::build(terms, vec![d1, d2], &AnnotationConfig::default()).unwrap();
///
/// assert_eq!(report.accepted(), 1);
/// assert_eq!(report.skipped(), 1);
/// assert_eq!(snapshot.annotations().len(), 1);
/// ```
#[derive(Debug)]
pub struct Snapshot {
    ontology: Arc<Ontology>,
    annotations: AnnotationIndex,
    ic: InformationContent,
}

impl Snapshot {
    /// Builds the ontology, the annotation index and the information content
    ///
    /// # Errors
    ///
    /// [`PhenoError::MalformedOntology`] if the ontology contains cycles,
    /// dangling parent references or duplicate terms. Invalid disease
    /// records do not fail the build, they are listed in the [`LoadReport`].
    pub fn build<T, D>(
        terms: T,
        diseases: D,
        config: &AnnotationConfig,
    ) -> PhenoResult<(Self, LoadReport)>
    where
        T: IntoIterator<Item = TermRecord>,
        D: IntoIterator<Item = DiseaseRecord>,
    {
        let ontology = Arc::new(Ontology::load(terms)?);
        Ok(Self::from_ontology(ontology, diseases, config))
    }

    /// Builds the annotation index and information content for an existing ontology
    pub fn from_ontology<D: IntoIterator<Item = DiseaseRecord>>(
        ontology: Arc<Ontology>,
        diseases: D,
        config: &AnnotationConfig,
    ) -> (Self, LoadReport) {
        let (annotations, report) =
            AnnotationIndex::build(diseases, Arc::clone(&ontology), config);
        let ic = InformationContent::build(&annotations);
        info!(
            "Built snapshot with {} terms and {} diseases",
            ontology.len(),
            annotations.len()
        );
        (
            Self {
                ontology,
                annotations,
                ic,
            },
            report,
        )
    }

    /// The ontology of the snapshot
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub(crate) fn shared_ontology(&self) -> Arc<Ontology> {
        Arc::clone(&self.ontology)
    }

    /// The disease annotations of the snapshot
    pub fn annotations(&self) -> &AnnotationIndex {
        &self.annotations
    }

    /// The information content of every term
    pub fn information_content(&self) -> &InformationContent {
        &self.ic
    }

    /// Returns the information content of a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn weight_of<I: AsRef<str>>(&self, term: I) -> PhenoResult<f64> {
        self.ic.weight_of(term)
    }

    /// Returns the propagated annotation frequency of a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn frequency_of<I: AsRef<str>>(&self, term: I) -> PhenoResult<f64> {
        self.annotations.frequency_of(term)
    }

    /// Ranks all diseases against the query terms
    ///
    /// Every disease receives the sum of the best [`Resnik`] match of each
    /// query term against its annotated terms. Duplicate query terms
    /// count once. The ranking is flagged as rare if the best score is
    /// below `threshold`.
    ///
    /// # Errors
    ///
    /// - [`PhenoError::UnknownTerm`] if a query term is not part of the ontology
    /// - [`PhenoError::InvalidInput`] if `threshold` is NaN
    pub fn rank<I>(&self, query: I, threshold: f64) -> PhenoResult<Ranking>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.rank_with(&Resnik::new(&self.ic), query, threshold)
    }

    /// Ranks all diseases with a custom term similarity
    ///
    /// # Errors
    ///
    /// - [`PhenoError::UnknownTerm`] if a query term is not part of the ontology
    /// - [`PhenoError::InvalidInput`] if `threshold` is NaN
    pub fn rank_with<S, I>(
        &self,
        similarity: &S,
        query: I,
        threshold: f64,
    ) -> PhenoResult<Ranking>
    where
        S: Similarity,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if threshold.is_nan() {
            return Err(PhenoError::InvalidInput(
                "rarity threshold must be a number".to_string(),
            ));
        }
        let query = self.resolve(query)?;
        Ok(ranking::rank(&self.annotations, similarity, &query, threshold))
    }

    fn resolve<I>(&self, query: I) -> PhenoResult<TermGroup>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut group = TermGroup::new();
        for term in query {
            let term = term.as_ref();
            let index = self
                .ontology
                .index_of(term)
                .ok_or_else(|| PhenoError::UnknownTerm(term.to_string()))?;
            group.insert(index);
        }
        Ok(group)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::DataQualityIssue;
    use crate::{fixtures, Term};

    #[test]
    fn cyclic_ontology() {
        let terms = vec![
            TermRecord::new("A", "First").with_parent("B"),
            TermRecord::new("B", "Second").with_parent("A"),
        ];
        let result = Snapshot::build(terms, Vec::new(), &AnnotationConfig::default());
        assert!(matches!(result, Err(PhenoError::MalformedOntology(_))));
    }

    #[test]
    fn reports_skipped_diseases() {
        let mut diseases = fixtures::nervous_system_diseases();
        let mut broken = DiseaseRecord::new("ORPHA:9", "Broken");
        broken.add_term("HP:9999999", None);
        diseases.push(broken);

        let (snapshot, report) = Snapshot::from_ontology(
            Arc::new(fixtures::nervous_system_ontology()),
            diseases,
            &AnnotationConfig::default(),
        );
        assert_eq!(report.accepted(), 4);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            report.issues(),
            &[DataQualityIssue::UnknownTerm {
                disease: "ORPHA:9".into(),
                term: "HP:9999999".into()
            }]
        );
        assert!(snapshot.annotations().disease("ORPHA:9").is_none());
    }

    #[test]
    fn delegates_lookups() {
        let (snapshot, _) = Snapshot::from_ontology(
            Arc::new(fixtures::chain_ontology()),
            fixtures::chain_diseases(),
            &AnnotationConfig::default(),
        );
        assert_eq!(snapshot.frequency_of("A"), Ok(2.0));
        assert_eq!(snapshot.frequency_of("C"), Ok(1.0));
        assert_eq!(
            snapshot.weight_of("C"),
            snapshot.information_content().weight_of("C")
        );
        assert!(snapshot.weight_of("Z").is_err());
        assert_eq!(snapshot.ontology().len(), 3);
    }

    #[test]
    fn from_data_files() {
        use crate::extract::{DictionaryExtractor, TermExtractor};
        use crate::parser::{disease_json, hp_obo};

        let terms = hp_obo::read_obo_file("tests/data/small.obo").expect("fixture exists");
        let diseases =
            disease_json::read_disease_json("tests/data/disease_data.json").expect("fixture exists");
        let (snapshot, report) = Snapshot::build(terms, diseases, &AnnotationConfig::default())
            .expect("fixture is valid");
        assert_eq!(report.accepted(), 4);
        assert_eq!(report.skipped(), 1);

        let extractor =
            DictionaryExtractor::from_files("tests/data/term_names.txt", "tests/data/synonyms.txt")
                .expect("fixtures exist");
        let query = extractor.extract("Grand mal seizure and poor vision");
        assert_eq!(query.len(), 3);

        let ranking = snapshot.rank(&query, 0.2).expect("extracted terms are known");
        assert_eq!(ranking.best().expect("four diseases").id(), "ORPHA:1");
        assert_eq!(ranking.results()[1].id(), "ORPHA:2");
        assert!(!ranking.is_rare());
    }

    struct Exact;

    impl Similarity for Exact {
        fn calculate(&self, a: &Term, b: &Term) -> f64 {
            if a == b {
                1.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn custom_similarity() {
        let (snapshot, _) = Snapshot::from_ontology(
            Arc::new(fixtures::nervous_system_ontology()),
            fixtures::nervous_system_diseases(),
            &AnnotationConfig::default(),
        );
        let ranking = snapshot
            .rank_with(&Exact, ["HP:0002069", "HP:0001250"], 1.5)
            .expect("query is valid");
        let best = ranking.best().expect("four diseases");
        assert_eq!(best.id(), "ORPHA:1");
        assert_eq!(best.score(), 2.0);
        assert!(!ranking.is_rare());
        assert_eq!(ranking.results()[1].score(), 0.0);
    }
}
