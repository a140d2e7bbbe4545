//! Contains the similarity algorithm used by the disease ranking

use crate::similarity::Similarity;
use crate::{InformationContent, Term};

/// Similarity score from Resnik
///
/// The score of two terms is the information content of their most
/// informative common ancestor. Both terms count as their own ancestor,
/// so identical terms score their own information content. Terms without
/// any common ancestor score 0.
///
/// For a detailed description see [Resnik P, Proceedings of the 14th IJCAI, (1995)](https://www.ijcai.org/Proceedings/95-1/Papers/059.pdf)
///
/// # Examples
///
/// ```
/// use phenorank::{Snapshot, TermRecord};
/// use phenorank::annotations::{AnnotationConfig, DiseaseRecord};
/// use phenorank::similarity::{Resnik, Similarity};
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
/// let ontology = snapshot.ontology();
/// let resnik = Resnik::new(snapshot.information_content());
///
/// let b = ontology.term("B").unwrap();
/// let c = ontology.term("C").unwrap();
///
/// assert!((resnik.calculate(&c, &c) - 2f64.ln()).abs() < 1e-12);
/// assert_eq!(resnik.calculate(&b, &c), 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resnik<'a> {
    ic: &'a InformationContent,
}

impl<'a> Resnik<'a> {
    /// Constructs a new struct to calculate the Resnik based similarity scores
    /// between two terms
    ///
    /// The information content must be derived from the same ontology
    /// as the terms that are compared.
    pub fn new(ic: &'a InformationContent) -> Self {
        Self { ic }
    }
}

impl Similarity for Resnik<'_> {
    fn calculate(&self, a: &Term, b: &Term) -> f64 {
        a.ancestor_ids()
            .intersection(b.ancestor_ids())
            .map(|index| self.ic.weight(index))
            .fold(0.0, f64::max)
    }
}
