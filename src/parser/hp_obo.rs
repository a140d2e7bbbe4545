use std::fs;
use std::path::Path;

use tracing::{trace, warn};

use crate::{PhenoError, PhenoResult, TermRecord};

/// Reads all non-obsolete `[Term]` stanzas of an OBO file
///
/// # Errors
///
/// [`PhenoError::CannotOpenFile`] if the file can't be read
pub fn read_obo_file<P: AsRef<Path>>(file: P) -> PhenoResult<Vec<TermRecord>> {
    let filename = file.as_ref().display().to_string();
    let content = fs::read_to_string(file).map_err(|_| PhenoError::CannotOpenFile(filename))?;
    Ok(parse_obo(&content))
}

/// Parses the content of an OBO file into [`TermRecord`]s
///
/// Only the `id`, `name` and `is_a` tags of `[Term]` stanzas are used.
/// Stanzas marked with `is_obsolete: true` are dropped, all other stanza
/// types are ignored.
///
/// # Examples
///
/// ```
/// use phenorank::TermId;
/// use phenorank::parser::hp_obo::parse_obo;
///
/// let obo = "format-version: 1.2
///
/// [Term]
/// id: HP:0000001
/// name: All
///
/// [Term]
/// id: HP:0000118
/// name: Phenotypic abnormality
/// is_a: HP:0000001 ! All
/// ";
///
/// let records = parse_obo(obo);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].parents, vec![TermId::from("HP:0000001")]);
/// ```
pub fn parse_obo(content: &str) -> Vec<TermRecord> {
    let mut records = Vec::new();
    let mut stanza: Option<Stanza> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            if let Some(finished) = stanza.take() {
                finished.finish(&mut records);
            }
            if line == "[Term]" {
                stanza = Some(Stanza::default());
            } else {
                trace!("Ignoring stanza {line}");
            }
            continue;
        }

        let Some(current) = stanza.as_mut() else {
            continue;
        };

        if let Some(value) = line.strip_prefix("id:") {
            current.id = Some(value.trim());
        } else if let Some(value) = line.strip_prefix("name:") {
            current.name = Some(value.trim());
        } else if let Some(value) = line.strip_prefix("is_a:") {
            match value.split_whitespace().next() {
                Some(parent) => current.parents.push(parent),
                None => warn!("Empty is_a tag: {line}"),
            }
        } else if let Some(value) = line.strip_prefix("is_obsolete:") {
            current.obsolete = value.trim() == "true";
        }
    }
    if let Some(finished) = stanza {
        finished.finish(&mut records);
    }

    records
}

#[derive(Default)]
struct Stanza<'a> {
    id: Option<&'a str>,
    name: Option<&'a str>,
    parents: Vec<&'a str>,
    obsolete: bool,
}

impl Stanza<'_> {
    fn finish(self, records: &mut Vec<TermRecord>) {
        match (self.id, self.name) {
            (Some(id), _) if self.obsolete => trace!("Dropping obsolete term {id}"),
            (Some(id), Some(name)) => {
                let mut record = TermRecord::new(id, name);
                for parent in self.parents {
                    record = record.with_parent(parent);
                }
                records.push(record);
            }
            (id, _) => warn!("Unable to parse term {}", id.unwrap_or("without id")),
        }
    }
}
