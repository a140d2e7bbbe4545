use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::annotations::{
    Annotation, AnnotationConfig, Disease, DiseaseId, DiseaseRecord, EvidenceMode,
};
use crate::term::{TermId, TermIndex};
use crate::{Ontology, PhenoError, PhenoResult};

/// A problem with a single annotation entry
///
/// Data-quality issues never abort loading. The affected entry (or the
/// whole disease) is skipped instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityIssue {
    /// The disease references a term that is not part of the ontology.
    /// The whole disease is skipped.
    UnknownTerm {
        /// The skipped disease
        disease: DiseaseId,
        /// The unknown term
        term: TermId,
    },
    /// The frequency label is not part of the frequency table.
    /// Only this annotation is skipped.
    UnknownFrequency {
        /// The affected disease
        disease: DiseaseId,
        /// The skipped term
        term: TermId,
        /// The unknown label
        label: String,
    },
    /// The disease identifier was used before. The later record is skipped.
    DuplicateDisease {
        /// The duplicated identifier
        disease: DiseaseId,
    },
    /// The disease identifier is empty. The record is skipped.
    EmptyIdentifier {
        /// The label of the skipped record
        name: String,
    },
}

impl Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityIssue::UnknownTerm { disease, term } => {
                write!(f, "{disease} references unknown term {term}")
            }
            DataQualityIssue::UnknownFrequency {
                disease,
                term,
                label,
            } => write!(f, "{disease} uses unknown frequency '{label}' for {term}"),
            DataQualityIssue::DuplicateDisease { disease } => {
                write!(f, "{disease} is defined more than once")
            }
            DataQualityIssue::EmptyIdentifier { name } => {
                write!(f, "disease '{name}' has no identifier")
            }
        }
    }
}

/// Summary of an annotation load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    accepted: usize,
    skipped: usize,
    issues: Vec<DataQualityIssue>,
}

impl LoadReport {
    /// Number of diseases that were added to the index
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Number of disease records that were rejected
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// All recorded data-quality issues, in input order
    pub fn issues(&self) -> &[DataQualityIssue] {
        &self.issues
    }

    /// Returns `true` if no data-quality issue occurred
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Maps every disease to its terms and aggregates the term frequencies
///
/// The frequency of a term is the sum of evidence weights of all diseases
/// annotated with the term or any of its descendants. Each disease
/// contributes at most once to every term: if several annotations of a
/// disease reach the same ancestor, the highest weight is used. Therefore
/// the frequency of a term never exceeds the number of diseases and is
/// never lower than the frequency of any of its descendants.
///
/// The total evidence is the sum of the highest annotation weight of every
/// disease. It is the frequency a term reaches when every disease is
/// annotated with it or one of its descendants.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use phenorank::{Ontology, TermRecord};
/// use phenorank::annotations::{AnnotationConfig, AnnotationIndex, DiseaseRecord};
///
/// let ontology = Arc::new(Ontology::load(vec![
///     TermRecord::new("A", "Root"),
///     TermRecord::new("B", "Middle").with_parent("A"),
///     TermRecord::new("C", "Leaf").with_parent("B"),
/// ]).unwrap());
///
/// let mut d1 = DiseaseRecord::new("D1", "Leaf disease");
/// d1.add_term("C", None);
/// let mut d2 = DiseaseRecord::new("D2", "Middle disease");
/// d2.add_term("B", None);
/// let mut d3 = DiseaseRecord::new("D3", "Broken disease");
/// d3.add_term("X", None);
///
/// let (index, report) = AnnotationIndex::build(
///     vec![d1, d2, d3],
///     ontology,
///     &AnnotationConfig::default(),
/// );
///
/// assert_eq!(report.accepted(), 2);
/// assert_eq!(report.skipped(), 1);
/// assert_eq!(index.total_diseases(), 2);
/// assert_eq!(index.frequency_of("A").unwrap(), 2.0);
/// assert_eq!(index.frequency_of("B").unwrap(), 2.0);
/// assert_eq!(index.frequency_of("C").unwrap(), 1.0);
/// ```
#[derive(Debug)]
pub struct AnnotationIndex {
    ontology: Arc<Ontology>,
    diseases: Vec<Disease>,
    lookup: HashMap<DiseaseId, usize>,
    frequencies: Vec<f64>,
    total_evidence: f64,
}

impl AnnotationIndex {
    /// Validates all disease records and computes the term frequencies
    ///
    /// Records referencing unknown terms are skipped and reported, the
    /// load itself never fails.
    pub fn build<I: IntoIterator<Item = DiseaseRecord>>(
        records: I,
        ontology: Arc<Ontology>,
        config: &AnnotationConfig,
    ) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let mut diseases: Vec<Disease> = Vec::new();
        let mut seen: HashSet<DiseaseId> = HashSet::new();

        for record in records {
            if record.id.as_str().trim().is_empty() {
                warn!("Skipping disease '{}' without identifier", record.name);
                report.issues.push(DataQualityIssue::EmptyIdentifier { name: record.name });
                report.skipped += 1;
                continue;
            }
            if seen.contains(&record.id) {
                warn!("Skipping duplicate disease {}", record.id);
                report
                    .issues
                    .push(DataQualityIssue::DuplicateDisease { disease: record.id });
                report.skipped += 1;
                continue;
            }
            match validate(record, &ontology, config, &mut report.issues) {
                Some(disease) => {
                    seen.insert(disease.id().clone());
                    diseases.push(disease);
                }
                None => report.skipped += 1,
            }
        }

        diseases.sort_by(|a, b| a.id().cmp(b.id()));
        let lookup = diseases
            .iter()
            .enumerate()
            .map(|(idx, disease)| (disease.id().clone(), idx))
            .collect();
        report.accepted = diseases.len();

        let frequencies = propagate_frequencies(&ontology, &diseases);
        let total_evidence = diseases
            .iter()
            .map(|disease| {
                disease
                    .annotations()
                    .iter()
                    .map(Annotation::weight)
                    .fold(0.0, f64::max)
            })
            .sum();

        if report.is_clean() {
            info!("Indexed {} diseases", report.accepted);
        } else {
            warn!(
                "Indexed {} diseases, skipped {} with {} data-quality issues",
                report.accepted,
                report.skipped,
                report.issues.len()
            );
        }

        (
            Self {
                ontology,
                diseases,
                lookup,
                frequencies,
                total_evidence,
            },
            report,
        )
    }

    /// The ontology the index was built against
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub(crate) fn shared_ontology(&self) -> Arc<Ontology> {
        Arc::clone(&self.ontology)
    }

    /// Returns the number of diseases
    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    /// Returns `true` if the index does not contain any disease
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }

    /// The number of distinct diseases
    pub fn total_diseases(&self) -> usize {
        self.diseases.len()
    }

    /// The sum of the highest annotation weight of every disease, used as
    /// denominator for the information content
    ///
    /// Equals the number of annotated diseases when frequency labels are
    /// ignored or every disease has an annotation of weight 1.0.
    pub fn total_evidence(&self) -> f64 {
        self.total_evidence
    }

    /// Returns the [`Disease`] with the given identifier
    pub fn disease<I: AsRef<str>>(&self, id: I) -> Option<&Disease> {
        self.lookup
            .get(id.as_ref())
            .map(|idx| &self.diseases[*idx])
    }

    /// Returns the terms and evidence weights of a disease
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownDisease`] if the disease is not part of the index
    pub fn terms_of<I: AsRef<str>>(&self, id: I) -> PhenoResult<&[Annotation]> {
        self.disease(id.as_ref())
            .map(Disease::annotations)
            .ok_or_else(|| PhenoError::UnknownDisease(id.as_ref().to_string()))
    }

    /// Iterates the identifiers of all diseases in ascending order
    pub fn all_diseases(&self) -> impl Iterator<Item = &DiseaseId> {
        self.diseases.iter().map(Disease::id)
    }

    /// Iterates all diseases in ascending order of their identifiers
    pub fn diseases(&self) -> std::slice::Iter<'_, Disease> {
        self.diseases.iter()
    }

    /// Returns the propagated frequency of a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn frequency_of<I: AsRef<str>>(&self, term: I) -> PhenoResult<f64> {
        let index = self
            .ontology
            .index_of(term.as_ref())
            .ok_or_else(|| PhenoError::UnknownTerm(term.as_ref().to_string()))?;
        Ok(self.frequency(index))
    }

    pub(crate) fn frequency(&self, index: TermIndex) -> f64 {
        self.frequencies[index.as_usize()]
    }

    pub(crate) fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }
}

/// Converts a record into a [`Disease`]
///
/// Returns `None` if the record references unknown terms
fn validate(
    record: DiseaseRecord,
    ontology: &Ontology,
    config: &AnnotationConfig,
    issues: &mut Vec<DataQualityIssue>,
) -> Option<Disease> {
    let mut resolved: Vec<(TermIndex, TermId, Option<String>)> =
        Vec::with_capacity(record.terms.len());
    let mut valid = true;
    for (term, label) in record.terms {
        if let Some(index) = ontology.index_of(term.as_str()) {
            resolved.push((index, term, label));
        } else {
            warn!("Skipping {}: unknown term {}", record.id, term);
            issues.push(DataQualityIssue::UnknownTerm {
                disease: record.id.clone(),
                term,
            });
            valid = false;
        }
    }
    if !valid {
        return None;
    }

    let mut by_term: HashMap<TermIndex, Annotation> = HashMap::with_capacity(resolved.len());
    for (index, term, label) in resolved {
        let weight = match (config.evidence, label) {
            (EvidenceMode::Counted, _) | (EvidenceMode::Weighted, None) => 1.0,
            (EvidenceMode::Weighted, Some(label)) => {
                if let Some(weight) = config.frequencies.weight_of(&label) {
                    weight
                } else {
                    warn!("{}: unknown frequency '{}' for {}", record.id, label, term);
                    issues.push(DataQualityIssue::UnknownFrequency {
                        disease: record.id.clone(),
                        term,
                        label,
                    });
                    continue;
                }
            }
        };
        by_term
            .entry(index)
            .and_modify(|existing| {
                if weight > existing.weight() {
                    *existing = Annotation::new(existing.term().clone(), index, weight);
                }
            })
            .or_insert_with(|| Annotation::new(term, index, weight));
    }

    debug!("{} has {} annotations", record.id, by_term.len());
    Some(Disease::new(
        record.id,
        &record.name,
        by_term.into_values().collect(),
    ))
}

/// Adds the evidence weight of every annotation to the term and all its ancestors
fn propagate_frequencies(ontology: &Ontology, diseases: &[Disease]) -> Vec<f64> {
    let mut frequencies = vec![0.0; ontology.len()];
    let mut best: HashMap<TermIndex, f64> = HashMap::new();

    for disease in diseases {
        best.clear();
        for annotation in disease.annotations() {
            for ancestor in ontology.get(annotation.index()).ancestors() {
                let weight = best.entry(ancestor).or_insert(0.0);
                if annotation.weight() > *weight {
                    *weight = annotation.weight();
                }
            }
        }
        for (index, weight) in &best {
            frequencies[index.as_usize()] += weight;
        }
    }
    frequencies
}
