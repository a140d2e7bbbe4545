use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{PhenoError, PhenoResult};

/// Maps categorical frequency labels to evidence weights
///
/// Labels are matched case-insensitively, ignoring surrounding whitespace
/// and a trailing parenthesized range, so that `Very frequent (99-80%)`
/// and `very frequent` refer to the same entry. Every weight lies in (0, 1].
///
/// The default table contains:
///
/// | Label | Weight |
/// | --- | --- |
/// | obligate | 1.0 |
/// | very frequent | 0.9 |
/// | frequent | 0.5 |
/// | occasional | 0.2 |
/// | rare | 0.05 |
/// | very rare | 0.05 |
///
/// # Examples
///
/// ```
/// use phenorank::annotations::FrequencyTable;
///
/// let table = FrequencyTable::default();
/// assert_eq!(table.weight_of("Very frequent (99-80%)"), Some(0.9));
/// assert_eq!(table.weight_of("Excluded (0%)"), None);
///
/// let custom = FrequencyTable::from_json_str(r#"{"common": 0.7, "uncommon": 0.1}"#).unwrap();
/// assert_eq!(custom.weight_of("Common"), Some(0.7));
/// assert!(FrequencyTable::from_json_str(r#"{"never": 0.0}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "HashMap<String, f64>")]
pub struct FrequencyTable {
    weights: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Constructs an empty table
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    /// Adds or replaces the weight of a label
    ///
    /// # Errors
    ///
    /// [`PhenoError::InvalidFrequencyWeight`] if the weight is not within (0, 1]
    pub fn insert(&mut self, label: &str, weight: f64) -> PhenoResult<()> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(PhenoError::InvalidFrequencyWeight {
                label: label.to_string(),
                weight,
            });
        }
        self.weights.insert(normalize(label), weight);
        Ok(())
    }

    /// Returns the weight of the label, if the label is known
    pub fn weight_of(&self, label: &str) -> Option<f64> {
        self.weights.get(&normalize(label)).copied()
    }

    /// Returns the number of labels
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if the table does not contain any labels
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Parses a table from a JSON object of `label: weight` pairs
    ///
    /// # Errors
    ///
    /// - [`PhenoError::InvalidInput`] if the JSON is malformed
    /// - [`PhenoError::InvalidFrequencyWeight`] if a weight is not within (0, 1]
    pub fn from_json_str(s: &str) -> PhenoResult<Self> {
        let raw: HashMap<String, f64> = serde_json::from_str(s)?;
        Self::try_from(raw)
    }

    /// Reads a table from a JSON file
    ///
    /// # Errors
    ///
    /// - [`PhenoError::CannotOpenFile`] if the file cannot be read
    /// - see [`FrequencyTable::from_json_str`]
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PhenoResult<Self> {
        let filename = path.as_ref().display().to_string();
        let content =
            fs::read_to_string(path).map_err(|_| PhenoError::CannotOpenFile(filename))?;
        Self::from_json_str(&content)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        let mut weights = HashMap::with_capacity(6);
        for (label, weight) in [
            ("obligate", 1.0),
            ("very frequent", 0.9),
            ("frequent", 0.5),
            ("occasional", 0.2),
            ("rare", 0.05),
            ("very rare", 0.05),
        ] {
            weights.insert(label.to_string(), weight);
        }
        Self { weights }
    }
}

impl TryFrom<HashMap<String, f64>> for FrequencyTable {
    type Error = PhenoError;
    fn try_from(raw: HashMap<String, f64>) -> PhenoResult<Self> {
        let mut table = FrequencyTable::new();
        for (label, weight) in raw {
            table.insert(&label, weight)?;
        }
        Ok(table)
    }
}

/// `"  Very frequent (99-80%) "` => `"very frequent"`
fn normalize(label: &str) -> String {
    let label = match label.find('(') {
        Some(idx) => &label[..idx],
        None => label,
    };
    label.trim().to_lowercase()
}

/// Defines how evidence weights flow into the term frequencies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvidenceMode {
    /// Every annotation contributes the weight of its frequency label,
    /// or 1.0 if no label is present
    #[default]
    Weighted,
    /// Every annotation contributes 1.0, frequency labels are ignored
    Counted,
}

/// Configuration for building an [`crate::annotations::AnnotationIndex`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationConfig {
    /// Frequency label to weight mapping
    pub frequencies: FrequencyTable,
    /// Defines whether the frequency weights are used
    pub evidence: EvidenceMode,
}

impl AnnotationConfig {
    /// Constructs a configuration with a custom frequency table
    pub fn new(frequencies: FrequencyTable, evidence: EvidenceMode) -> Self {
        Self {
            frequencies,
            evidence,
        }
    }
}
