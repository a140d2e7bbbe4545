use std::sync::Arc;

use tracing::debug;

use crate::annotations::AnnotationIndex;
use crate::term::TermIndex;
use crate::{Ontology, PhenoError, PhenoResult};

/// The information content (IC) of every term of the ontology
///
/// The IC of a term is `-ln(frequency / total_evidence)`, where both are
/// taken from the [`AnnotationIndex`]. Without frequency labels the total
/// evidence is the number of diseases. Specific terms that are annotated
/// to few diseases have a high IC, generic terms a low one. A term
/// annotated to every disease has an IC of 0, also when the annotations
/// are weighted by frequency labels.
///
/// Terms that are never annotated, neither directly nor through a
/// descendant, receive the highest IC observed in the dataset plus one.
/// If no term is annotated at all, every term has an IC of 1.
///
/// The table is derived once and never changes. A new annotation index
/// requires a new `InformationContent`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use phenorank::{InformationContent, Ontology, TermRecord};
/// use phenorank::annotations::{AnnotationConfig, AnnotationIndex, DiseaseRecord};
///
/// let ontology = Arc::new(Ontology::load(vec![
///     TermRecord::new("A", "Root"),
///     TermRecord::new("B", "Middle").with_parent("A"),
///     TermRecord::new("C", "Leaf").with_parent("B"),
///     TermRecord::new("U", "Unused").with_parent("A"),
/// ]).unwrap());
///
/// let mut d1 = DiseaseRecord::new("D1", "Leaf disease");
/// d1.add_term("C", None);
/// let mut d2 = DiseaseRecord::new("D2", "Middle disease");
/// d2.add_term("B", None);
///
/// let (index, _) = AnnotationIndex::build(vec![d1, d2], ontology, &AnnotationConfig::default());
/// let ic = InformationContent::build(&index);
///
/// assert_eq!(ic.weight_of("A").unwrap(), 0.0);
/// assert!((ic.weight_of("C").unwrap() - 2f64.ln()).abs() < 1e-12);
/// assert!((ic.weight_of("U").unwrap() - (2f64.ln() + 1.0)).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct InformationContent {
    ontology: Arc<Ontology>,
    weights: Vec<f64>,
    max_weight: f64,
}

impl InformationContent {
    /// Derives the information content of every term from the annotation index
    pub fn build(index: &AnnotationIndex) -> Self {
        let total = index.total_evidence();
        let frequencies = index.frequencies();

        let mut weights: Vec<Option<f64>> = Vec::with_capacity(frequencies.len());
        let mut max_observed = 0.0f64;
        for frequency in frequencies {
            if *frequency > 0.0 && total > 0.0 {
                let ic = (-(frequency / total).ln()).max(0.0);
                max_observed = max_observed.max(ic);
                weights.push(Some(ic));
            } else {
                weights.push(None);
            }
        }

        let unobserved = max_observed + 1.0;
        let weights: Vec<f64> = weights
            .into_iter()
            .map(|weight| weight.unwrap_or(unobserved))
            .collect();
        let max_weight = weights.iter().copied().fold(0.0, f64::max);

        debug!(
            "Calculated information content for {} terms (max observed {max_observed})",
            weights.len()
        );

        Self {
            ontology: index.shared_ontology(),
            weights,
            max_weight,
        }
    }

    /// Returns the information content of a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn weight_of<I: AsRef<str>>(&self, term: I) -> PhenoResult<f64> {
        self.ontology
            .index_of(term.as_ref())
            .map(|index| self.weight(index))
            .ok_or_else(|| PhenoError::UnknownTerm(term.as_ref().to_string()))
    }

    /// The highest information content of any term
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub(crate) fn weight(&self, index: TermIndex) -> f64 {
        self.weights[index.as_usize()]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::{AnnotationConfig, DiseaseRecord, EvidenceMode, FrequencyTable};
    use crate::fixtures;

    fn ic_for(ontology: Ontology, diseases: Vec<DiseaseRecord>) -> InformationContent {
        let (index, _) =
            AnnotationIndex::build(diseases, Arc::new(ontology), &AnnotationConfig::default());
        InformationContent::build(&index)
    }

    #[test]
    fn chain_example() {
        let ic = ic_for(fixtures::chain_ontology(), fixtures::chain_diseases());
        let a = ic.weight_of("A").expect("A exists");
        let b = ic.weight_of("B").expect("B exists");
        let c = ic.weight_of("C").expect("C exists");
        assert!(a.abs() < 1e-12);
        assert!(b.abs() < 1e-12);
        assert!(c > b);
        assert!((c - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn non_negative_and_monotonic() {
        let ontology = Arc::new(fixtures::nervous_system_ontology());
        let (index, _) = AnnotationIndex::build(
            fixtures::nervous_system_diseases(),
            Arc::clone(&ontology),
            &AnnotationConfig::default(),
        );
        let ic = InformationContent::build(&index);

        let mut pairs: Vec<(f64, f64)> = ontology
            .iter()
            .map(|term| {
                (
                    index.frequency_of(term.id()).expect("term exists"),
                    ic.weight_of(term.id()).expect("term exists"),
                )
            })
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, weight) in &pairs {
            assert!(*weight >= 0.0);
        }
        for window in pairs.windows(2) {
            if window[0].0 < window[1].0 && window[0].0 > 0.0 {
                assert!(window[0].1 >= window[1].1);
            }
        }
    }

    #[test]
    fn unobserved_terms_get_dataset_maximum() {
        let ic = ic_for(fixtures::nervous_system_ontology(), fixtures::nervous_system_diseases());
        let unobserved = ic.weight_of("HP:0000505").expect("term exists");
        assert_eq!(unobserved, ic.max_weight());
        for term in ["HP:0000001", "HP:0001250", "HP:0002069", "HP:0000478"] {
            assert!(ic.weight_of(term).expect("term exists") < unobserved);
        }
        assert!(ic.weight_of("HP:0000001").expect("root exists").abs() < 1e-12);
    }

    #[test]
    fn without_diseases() {
        let ic = ic_for(fixtures::chain_ontology(), Vec::new());
        assert_eq!(ic.weight_of("A"), Ok(1.0));
        assert_eq!(ic.weight_of("C"), Ok(1.0));
        assert_eq!(ic.max_weight(), 1.0);
    }

    #[test]
    fn weighted_root_is_uninformative() {
        let mut d1 = DiseaseRecord::new("D1", "Leaf disease");
        d1.add_term("C", Some("Occasional (29-5%)"));
        let mut d2 = DiseaseRecord::new("D2", "Middle disease");
        d2.add_term("B", Some("Occasional (29-5%)"));

        let ic = ic_for(fixtures::chain_ontology(), vec![d1, d2]);
        assert!(ic.weight_of("A").expect("A exists").abs() < 1e-12);
        assert!(ic.weight_of("B").expect("B exists").abs() < 1e-12);
        assert!((ic.weight_of("C").expect("C exists") - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn weighted_matches_counted_for_uniform_labels() {
        let ontology = Arc::new(fixtures::chain_ontology());
        let records = || {
            let mut d1 = DiseaseRecord::new("D1", "Leaf disease");
            d1.add_term("C", Some("Frequent"));
            let mut d2 = DiseaseRecord::new("D2", "Middle disease");
            d2.add_term("B", Some("Frequent"));
            vec![d1, d2]
        };
        let counted = AnnotationConfig::new(FrequencyTable::default(), EvidenceMode::Counted);
        let (weighted, _) =
            AnnotationIndex::build(records(), Arc::clone(&ontology), &AnnotationConfig::default());
        let (counted, _) = AnnotationIndex::build(records(), Arc::clone(&ontology), &counted);
        let weighted = InformationContent::build(&weighted);
        let counted = InformationContent::build(&counted);
        for term in ontology.iter() {
            let a = weighted.weight_of(term.id()).expect("term exists");
            let b = counted.weight_of(term.id()).expect("term exists");
            assert!((a - b).abs() < 1e-12, "{}: {a} != {b}", term.id());
        }
    }

    #[test]
    fn unknown_term() {
        let ic = ic_for(fixtures::chain_ontology(), fixtures::chain_diseases());
        assert_eq!(
            ic.weight_of("Z"),
            Err(PhenoError::UnknownTerm("Z".to_string()))
        );
    }
}
