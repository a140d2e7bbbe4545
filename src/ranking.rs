use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::annotations::{AnnotationIndex, Disease, DiseaseId};
use crate::similarity::Similarity;
use crate::term::{TermGroup, TermIndex};
use crate::Ontology;

/// A single disease of a [`Ranking`] and its score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDisease {
    id: DiseaseId,
    name: Arc<str>,
    score: f64,
}

impl RankedDisease {
    /// The identifier of the disease
    pub fn id(&self) -> &DiseaseId {
        &self.id
    }

    /// The display label of the disease
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw score of the disease
    ///
    /// The score is the sum of the best matches of every query term and
    /// is not normalized by the size of the query.
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// The result of ranking all diseases against a set of query terms
///
/// Diseases are ordered by descending score. Diseases with the same
/// score are ordered by their identifier.
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
///
/// let (snapshot, _) = Snapshot::build(terms, vec![d1, d2], &AnnotationConfig::default()).unwrap();
/// let ranking = snapshot.rank(["C"], 0.2).unwrap();
///
/// let ids: Vec<&str> = ranking.iter().map(|d| d.id().as_str()).collect();
/// assert_eq!(ids, vec!["D1", "D2"]);
/// assert!(!ranking.is_rare());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    results: Vec<RankedDisease>,
    is_rare: bool,
    query_len: usize,
}

impl Ranking {
    /// All ranked diseases, best match first
    pub fn results(&self) -> &[RankedDisease] {
        &self.results
    }

    /// Iterates all ranked diseases, best match first
    pub fn iter(&self) -> std::slice::Iter<'_, RankedDisease> {
        self.results.iter()
    }

    /// Returns `true` if the best match is weaker than the threshold
    ///
    /// This is also the case for an empty query or if no disease was ranked at all.
    pub fn is_rare(&self) -> bool {
        self.is_rare
    }

    /// The best matching disease
    pub fn best(&self) -> Option<&RankedDisease> {
        self.results.first()
    }

    /// The `n` best matching diseases
    pub fn top(&self, n: usize) -> &[RankedDisease] {
        &self.results[..n.min(self.results.len())]
    }

    /// The number of ranked diseases
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if no disease was ranked
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The number of distinct terms of the query
    pub fn query_len(&self) -> usize {
        self.query_len
    }

    /// The scores divided by the number of query terms, in ranking order
    ///
    /// All scores are 0 for an empty query.
    pub fn normalized_scores(&self) -> Vec<f64> {
        if self.query_len == 0 {
            return vec![0.0; self.results.len()];
        }
        let n = query_len_f64(self.query_len);
        self.results.iter().map(|d| d.score / n).collect()
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a RankedDisease;
    type IntoIter = std::slice::Iter<'a, RankedDisease>;
    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[allow(clippy::cast_precision_loss)]
fn query_len_f64(n: usize) -> f64 {
    n as f64
}

/// Scores every disease of the index against the query
///
/// All terms of the query must belong to the ontology of the index.
pub(crate) fn rank<S: Similarity>(
    index: &AnnotationIndex,
    similarity: &S,
    query: &TermGroup,
    threshold: f64,
) -> Ranking {
    let mut cache = PairCache::new(index.ontology(), similarity);

    let mut results: Vec<RankedDisease> = index
        .diseases()
        .map(|disease| RankedDisease {
            id: disease.id().clone(),
            name: disease.shared_name(),
            score: score_disease(query, disease, &mut cache),
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

    let is_rare = match results.first() {
        Some(best) => query.is_empty() || best.score < threshold,
        None => true,
    };

    debug!(
        "Ranked {} diseases for {} query terms ({} cached term pairs)",
        results.len(),
        query.len(),
        cache.len()
    );

    Ranking {
        results,
        is_rare,
        query_len: query.len(),
    }
}

/// Sum of the best match of every query term against the disease terms
fn score_disease<S: Similarity>(
    query: &TermGroup,
    disease: &Disease,
    cache: &mut PairCache<S>,
) -> f64 {
    query
        .iter()
        .map(|q| {
            disease
                .annotations()
                .iter()
                .map(|annotation| cache.get(q, annotation.index()))
                .fold(0.0, f64::max)
        })
        .sum()
}

/// Similarity scores of term pairs, valid for a single ranking call
struct PairCache<'a, S> {
    ontology: &'a Ontology,
    similarity: &'a S,
    scores: HashMap<(TermIndex, TermIndex), f64>,
}

impl<'a, S: Similarity> PairCache<'a, S> {
    fn new(ontology: &'a Ontology, similarity: &'a S) -> Self {
        Self {
            ontology,
            similarity,
            scores: HashMap::new(),
        }
    }

    fn get(&mut self, a: TermIndex, b: TermIndex) -> f64 {
        let key = if a <= b { (a, b) } else { (b, a) };
        let ontology = self.ontology;
        let similarity = self.similarity;
        *self.scores.entry(key).or_insert_with(|| {
            similarity.calculate(&ontology.term_at(key.0), &ontology.term_at(key.1))
        })
    }

    fn len(&self) -> usize {
        self.scores.len()
    }
}
