//! Small ontologies and annotations shared by the unit tests

use crate::annotations::DiseaseRecord;
use crate::{Ontology, TermRecord};

/// `A <- B <- C`
pub(crate) fn chain_ontology() -> Ontology {
    Ontology::load(vec![
        TermRecord::new("A", "Root"),
        TermRecord::new("B", "Middle").with_parent("A"),
        TermRecord::new("C", "Leaf").with_parent("B"),
    ])
    .expect("chain ontology is valid")
}

/// `D1 = {C}`, `D2 = {B}`
pub(crate) fn chain_diseases() -> Vec<DiseaseRecord> {
    let mut d1 = DiseaseRecord::new("D1", "Leaf disease");
    d1.add_term("C", None);
    let mut d2 = DiseaseRecord::new("D2", "Middle disease");
    d2.add_term("B", None);
    vec![d1, d2]
}

/// The same terms as `tests/data/small.obo`
///
/// ```text
/// HP:0000001 All
/// └── HP:0000118 Phenotypic abnormality
///     ├── HP:0000707 Abnormality of the nervous system
///     │   └── HP:0012638 Abnormal nervous system physiology
///     │       └── HP:0001250 Seizure
///     │           ├── HP:0002069 Bilateral tonic-clonic seizure
///     │           └── HP:0007359 Focal-onset seizure
///     └── HP:0000478 Abnormality of the eye
///         └── HP:0000505 Visual impairment
/// ```
pub(crate) fn nervous_system_ontology() -> Ontology {
    Ontology::load(vec![
        TermRecord::new("HP:0000001", "All"),
        TermRecord::new("HP:0000118", "Phenotypic abnormality").with_parent("HP:0000001"),
        TermRecord::new("HP:0000707", "Abnormality of the nervous system")
            .with_parent("HP:0000118"),
        TermRecord::new("HP:0012638", "Abnormal nervous system physiology")
            .with_parent("HP:0000707"),
        TermRecord::new("HP:0001250", "Seizure").with_parent("HP:0012638"),
        TermRecord::new("HP:0002069", "Bilateral tonic-clonic seizure").with_parent("HP:0001250"),
        TermRecord::new("HP:0007359", "Focal-onset seizure").with_parent("HP:0001250"),
        TermRecord::new("HP:0000478", "Abnormality of the eye").with_parent("HP:0000118"),
        TermRecord::new("HP:0000505", "Visual impairment").with_parent("HP:0000478"),
    ])
    .expect("nervous system ontology is valid")
}

/// Four diseases, `HP:0000505` is never annotated
pub(crate) fn nervous_system_diseases() -> Vec<DiseaseRecord> {
    let mut generalized = DiseaseRecord::new("ORPHA:1", "Generalized epilepsy");
    generalized.add_term("HP:0002069", Some("Very frequent (99-80%)"));
    generalized.add_term("HP:0001250", None);

    let mut focal = DiseaseRecord::new("ORPHA:2", "Focal epilepsy");
    focal.add_term("HP:0007359", None);

    let mut eye = DiseaseRecord::new("ORPHA:3", "Eye disorder");
    eye.add_term("HP:0000478", None);

    let mut neuro = DiseaseRecord::new("ORPHA:4", "Neurological disorder");
    neuro.add_term("HP:0000707", None);

    vec![generalized, focal, eye, neuro]
}
