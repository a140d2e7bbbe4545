//! Module to parse the cached disease annotations in JSON format
//!
//! The document maps a disease key to its terms and the optional
//! frequency label of each term:
//!
//! ```json
//! {
//!   "ORPHA:58 | Alexander disease": {
//!     "hpo_terms": ["HP:0001250", "HP:0000256"],
//!     "frequencies": { "HP:0001250": "Very frequent (99-80%)" }
//!   }
//! }
//! ```
//!
//! The key is split at `" | "` into identifier and name. Keys without
//! separator are used as both.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::annotations::DiseaseRecord;
use crate::{PhenoError, PhenoResult};

#[derive(Debug, Deserialize)]
struct Entry {
    hpo_terms: Vec<String>,
    #[serde(default)]
    frequencies: HashMap<String, String>,
}

/// Reads all diseases of a JSON file
///
/// # Errors
///
/// - [`PhenoError::CannotOpenFile`]: Source file not present or can't be opened
/// - [`PhenoError::InvalidInput`]: The file is not a valid disease document
pub fn read_disease_json<P: AsRef<Path>>(file: P) -> PhenoResult<Vec<DiseaseRecord>> {
    let filename = file.as_ref().display().to_string();
    let content = fs::read_to_string(file).map_err(|_| PhenoError::CannotOpenFile(filename))?;
    parse_disease_json(&content)
}

/// Parses a disease document, diseases are ordered by their key
///
/// # Errors
///
/// [`PhenoError::InvalidInput`]: The input is not a valid disease document
///
/// # Examples
///
/// ```
/// use phenorank::parser::disease_json::parse_disease_json;
///
/// let json = r#"{
///     "ORPHA:58 | Alexander disease": {
///         "hpo_terms": ["HP:0001250"],
///         "frequencies": { "HP:0001250": "Very frequent (99-80%)" }
///     }
/// }"#;
///
/// let records = parse_disease_json(json).unwrap();
/// assert_eq!(records[0].id, "ORPHA:58");
/// assert_eq!(records[0].name, "Alexander disease");
/// assert_eq!(records[0].terms[0].1.as_deref(), Some("Very frequent (99-80%)"));
/// ```
pub fn parse_disease_json(content: &str) -> PhenoResult<Vec<DiseaseRecord>> {
    let document: BTreeMap<String, Entry> = serde_json::from_str(content)?;

    let records: Vec<DiseaseRecord> = document
        .into_iter()
        .map(|(key, entry)| {
            let (id, name) = split_key(&key);
            let mut record = DiseaseRecord::new(id, name);
            for term in &entry.hpo_terms {
                record.add_term(term.as_str(), entry.frequencies.get(term).map(String::as_str));
            }
            record
        })
        .collect();

    debug!("Parsed {} diseases from JSON", records.len());
    Ok(records)
}

fn split_key(key: &str) -> (&str, &str) {
    match key.split_once(" | ") {
        Some((id, name)) => (id.trim(), name.trim()),
        None => (key.trim(), key.trim()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keys() {
        assert_eq!(split_key("ORPHA:1 | Name"), ("ORPHA:1", "Name"));
        assert_eq!(split_key("ORPHA:1 | Name | With bar"), ("ORPHA:1", "Name | With bar"));
        assert_eq!(split_key("ORPHA:1"), ("ORPHA:1", "ORPHA:1"));
    }

    #[test]
    fn without_frequencies() {
        let json = r#"{"ORPHA:1": {"hpo_terms": ["HP:0000001", "HP:0000002"]}}"#;
        let records = parse_disease_json(json).expect("valid document");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].terms.len(), 2);
        assert!(records[0].terms.iter().all(|(_, label)| label.is_none()));
    }

    #[test]
    fn invalid_document() {
        assert!(matches!(
            parse_disease_json(r#"{"ORPHA:1": {"terms": []}}"#),
            Err(PhenoError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_disease_json("not json"),
            Err(PhenoError::InvalidInput(_))
        ));
    }

    #[test]
    fn read_file() {
        let records = read_disease_json("tests/data/disease_data.json").expect("fixture exists");
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].id, "ORPHA:1");
        assert_eq!(records[0].name, "Generalized epilepsy");
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_disease_json("tests/data/missing.json"),
            Err(PhenoError::CannotOpenFile(_))
        ));
    }
}
