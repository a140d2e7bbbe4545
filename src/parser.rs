//! Readers for the ontology, annotation and dictionary files
//!
//! The core of the crate only consumes [`crate::TermRecord`]s and
//! [`crate::annotations::DiseaseRecord`]s. The parsers in this module
//! produce them from the usual distribution formats.

pub mod disease_json;
/// Module to parse `hp.obo` file
pub mod hp_obo;

/// Module to parse disease annotations from the `phenotype.hpoa` file
///
/// # Example line
///
/// ```text
/// OMIM:619340  Developmental and epileptic encephalopathy 96      HP:0011097  PMID:31675180  PCS  HP:0040283  P  HPO:probinson[2021-06-21]
/// OMIM:609153  Pseudohyperkalemia                             NOT HP:0001878  PMID:2766660   PCS              P  HPO:lccarmody[2018-10-03]
/// ```
pub mod phenotype_hpoa {
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    use tracing::{debug, trace};

    use crate::annotations::DiseaseRecord;
    use crate::{PhenoError, PhenoResult};

    struct Row<'a> {
        id: &'a str,
        name: &'a str,
        term: &'a str,
        frequency: Option<&'static str>,
    }

    /// Returns the categorical label of an HPO frequency
    ///
    /// Frequency terms map to their name. Numeric frequencies like `1/2`
    /// or `50%` map to the label whose range contains them:
    ///
    /// | Frequency | Label |
    /// | --- | --- |
    /// | 100% | Obligate |
    /// | 80% - 99% | Very frequent |
    /// | 30% - 79% | Frequent |
    /// | 5% - 29% | Occasional |
    /// | 1% - 4% | Very rare |
    /// | 0% | Excluded |
    ///
    /// ```
    /// use phenorank::parser::phenotype_hpoa::frequency_label;
    ///
    /// assert_eq!(frequency_label("HP:0040281"), Some("Very frequent"));
    /// assert_eq!(frequency_label("3/7"), Some("Frequent"));
    /// assert_eq!(frequency_label("2%"), Some("Very rare"));
    /// assert_eq!(frequency_label("often"), None);
    /// ```
    pub fn frequency_label(value: &str) -> Option<&'static str> {
        match value.trim() {
            "HP:0040280" => Some("Obligate"),
            "HP:0040281" => Some("Very frequent"),
            "HP:0040282" => Some("Frequent"),
            "HP:0040283" => Some("Occasional"),
            "HP:0040284" => Some("Very rare"),
            "HP:0040285" => Some("Excluded"),
            other => numeric_frequency(other).map(frequency_bin),
        }
    }

    /// Parses `n/m` or `x%` into a fraction within [0, 1]
    fn numeric_frequency(value: &str) -> Option<f64> {
        let fraction = if let Some((n, m)) = value.split_once('/') {
            let n: u32 = n.trim().parse().ok()?;
            let m: u32 = m.trim().parse().ok()?;
            if m == 0 {
                return None;
            }
            f64::from(n) / f64::from(m)
        } else {
            let percent: f64 = value.strip_suffix('%')?.trim().parse().ok()?;
            percent / 100.0
        };
        (0.0..=1.0).contains(&fraction).then_some(fraction)
    }

    fn frequency_bin(fraction: f64) -> &'static str {
        if fraction >= 1.0 {
            "Obligate"
        } else if fraction >= 0.8 {
            "Very frequent"
        } else if fraction >= 0.3 {
            "Frequent"
        } else if fraction >= 0.05 {
            "Occasional"
        } else if fraction > 0.0 {
            "Very rare"
        } else {
            "Excluded"
        }
    }

    fn parse_line(line: &str) -> PhenoResult<Option<Row<'_>>> {
        if line.starts_with('#') || line.starts_with("database_id") || line.trim().is_empty() {
            return Ok(None);
        }

        let cols: Vec<&str> = line.trim_end().split('\t').collect();
        if cols.len() < 4 {
            return Err(PhenoError::InvalidInput(line.to_string()));
        }

        if cols[2] == "NOT" {
            return Ok(None);
        }

        // Column 11 is the aspect, only phenotypic abnormalities are annotations
        if let Some(aspect) = cols.get(10) {
            if !aspect.is_empty() && *aspect != "P" {
                trace!("Ignoring aspect {aspect}: {line}");
                return Ok(None);
            }
        }

        Ok(Some(Row {
            id: cols[0],
            name: cols[1],
            term: cols[3],
            frequency: cols.get(7).and_then(|value| frequency_label(value)),
        }))
    }

    /// Reads all disease annotations of a `phenotype.hpoa` file
    ///
    /// Diseases are returned in the order of their first appearance.
    ///
    /// # Errors
    ///
    /// - [`PhenoError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`PhenoError::InvalidInput`]: A line has less than 4 columns
    pub fn read_hpoa_file<P: AsRef<Path>>(file: P) -> PhenoResult<Vec<DiseaseRecord>> {
        let filename = file.as_ref().display().to_string();
        let file = File::open(file).map_err(|_| PhenoError::CannotOpenFile(filename))?;
        parse_hpoa(BufReader::new(file))
    }

    /// Parses disease annotations in `phenotype.hpoa` format
    ///
    /// # Errors
    ///
    /// [`PhenoError::InvalidInput`]: A line has less than 4 columns or is not valid UTF-8
    pub fn parse_hpoa<R: BufRead>(reader: R) -> PhenoResult<Vec<DiseaseRecord>> {
        let mut records: Vec<DiseaseRecord> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for line in reader.lines() {
            let line = line.map_err(|_| {
                PhenoError::InvalidInput("Invalid data in phenotype.hpoa".to_string())
            })?;
            let Some(row) = parse_line(&line)? else {
                continue;
            };
            let idx = match positions.get(row.id) {
                Some(idx) => *idx,
                None => {
                    positions.insert(row.id.to_string(), records.len());
                    records.push(DiseaseRecord::new(row.id, row.name));
                    records.len() - 1
                }
            };
            records[idx].add_term(row.term, row.frequency);
        }
        debug!("Parsed {} diseases from phenotype.hpoa", records.len());
        Ok(records)
    }

    #[cfg(test)]
    mod test_hpoa_parsing {
        use super::*;

        #[test]
        fn test_skip_comment() {
            let s = "#OMIM:600171\tGonadal agenesis\t\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]";
            assert!(parse_line(s)
                .expect("This line has the correct format")
                .is_none());
        }

        #[test]
        fn test_skip_header() {
            let s = "database_id\tdisease_name\tqualifier\thpo_id\treference\tevidence\tonset\tfrequency\tsex\tmodifier\taspect\tbiocuration";
            assert!(parse_line(s)
                .expect("The header is skipped")
                .is_none());
        }

        #[test]
        fn test_skip_not() {
            let s = "OMIM:600171\tGonadal agenesis\tNOT\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]";
            assert!(parse_line(s)
                .expect("This line has the correct format")
                .is_none());
        }

        #[test]
        fn test_skip_inheritance() {
            let s = "OMIM:600171\tGonadal agenesis\t\tHP:0000007\tOMIM:600171\tTAS\t\t\t\t\tI\tHPO:skoehler[2014-11-27]";
            assert!(parse_line(s)
                .expect("This line has the correct format")
                .is_none());
        }

        #[test]
        fn test_correct_line() {
            let s = "ORPHA:1\tGeneralized epilepsy\t\tHP:0002069\tORPHA:1\tTAS\t\tHP:0040281\t\t\tP\tORPHA:orphadata[2024-01-01]";
            let row = parse_line(s)
                .expect("This line has the correct format")
                .expect("Line describes an annotation");
            assert_eq!(row.id, "ORPHA:1");
            assert_eq!(row.name, "Generalized epilepsy");
            assert_eq!(row.term, "HP:0002069");
            assert_eq!(row.frequency, Some("Very frequent"));
        }

        #[test]
        fn test_numeric_frequency() {
            let s = "OMIM:619340\tDevelopmental and epileptic encephalopathy 96\t\tHP:0011097\tPMID:31675180\tPCS\t\t1/2\t\t\tP\tHPO:probinson[2021-06-21]";
            let row = parse_line(s)
                .expect("This line has the correct format")
                .expect("Line describes an annotation");
            assert_eq!(row.frequency, Some("Frequent"));
        }

        #[test]
        fn test_numeric_frequency_bins() {
            assert_eq!(frequency_label("7/7"), Some("Obligate"));
            assert_eq!(frequency_label("9/10"), Some("Very frequent"));
            assert_eq!(frequency_label("1/10"), Some("Occasional"));
            assert_eq!(frequency_label("5%"), Some("Occasional"));
            assert_eq!(frequency_label("0.5%"), Some("Very rare"));
            assert_eq!(frequency_label("0/12"), Some("Excluded"));
            assert_eq!(frequency_label("3/0"), None);
            assert_eq!(frequency_label("8/7"), None);
            assert_eq!(frequency_label("150%"), None);
            assert_eq!(frequency_label(""), None);
        }

        #[test]
        fn test_too_few_columns() {
            assert!(parse_line("OMIM:600171\tGonadal agenesis\t").is_err());
        }

        #[test]
        fn test_groups_by_disease() {
            let s = "#description\n\
                ORPHA:2\tFocal epilepsy\t\tHP:0007359\n\
                ORPHA:1\tGeneralized epilepsy\t\tHP:0002069\n\
                ORPHA:2\tFocal epilepsy\tNOT\tHP:0002069\n\
                ORPHA:2\tFocal epilepsy\t\tHP:0001250\n";
            let records = parse_hpoa(s.as_bytes()).expect("Input is valid");
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].id, "ORPHA:2");
            assert_eq!(records[0].terms.len(), 2);
            assert_eq!(records[1].id, "ORPHA:1");
            assert_eq!(records[1].terms.len(), 1);
        }

        #[test]
        fn test_read_file() {
            let records = read_hpoa_file("tests/data/phenotype.hpoa").expect("fixture exists");
            assert_eq!(records.len(), 4);
        }

        #[test]
        fn test_missing_file() {
            assert!(matches!(
                read_hpoa_file("tests/data/missing.hpoa"),
                Err(PhenoError::CannotOpenFile(_))
            ));
        }
    }
}

/// Module to parse the tables of term names and synonyms
///
/// Term names are stored as `id<TAB>name`, synonyms as `synonym<TAB>id`.
/// Lines that do not consist of exactly two columns are skipped.
pub mod term_names {
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    use tracing::trace;

    use crate::{PhenoError, PhenoResult, TermId};

    /// Reads `id<TAB>name` lines
    ///
    /// # Errors
    ///
    /// [`PhenoError::CannotOpenFile`]: Source file not present or can't be opened
    pub fn read_term_names<P: AsRef<Path>>(file: P) -> PhenoResult<Vec<(TermId, String)>> {
        Ok(read_pairs(file)?
            .into_iter()
            .map(|(id, name)| (TermId::from(id), name))
            .collect())
    }

    /// Reads `synonym<TAB>id` lines
    ///
    /// # Errors
    ///
    /// [`PhenoError::CannotOpenFile`]: Source file not present or can't be opened
    pub fn read_synonyms<P: AsRef<Path>>(file: P) -> PhenoResult<Vec<(String, TermId)>> {
        Ok(read_pairs(file)?
            .into_iter()
            .map(|(synonym, id)| (synonym, TermId::from(id)))
            .collect())
    }

    fn read_pairs<P: AsRef<Path>>(file: P) -> PhenoResult<Vec<(String, String)>> {
        let filename = file.as_ref().display().to_string();
        let file = File::open(file).map_err(|_| PhenoError::CannotOpenFile(filename))?;
        parse_pairs(BufReader::new(file))
    }

    fn parse_pairs<R: BufRead>(reader: R) -> PhenoResult<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|_| {
                PhenoError::InvalidInput("Invalid data in term table".to_string())
            })?;
            match pair(&line) {
                Some((left, right)) => pairs.push((left.to_string(), right.to_string())),
                None => trace!("Ignoring line: {line}"),
            }
        }
        Ok(pairs)
    }

    fn pair(line: &str) -> Option<(&str, &str)> {
        let mut cols = line.trim().split('\t');
        match (cols.next(), cols.next(), cols.next()) {
            (Some(left), Some(right), None) => Some((left, right)),
            _ => None,
        }
    }

    #[cfg(test)]
    mod test_term_names {
        use super::*;

        #[test]
        fn two_columns() {
            assert_eq!(pair("HP:0001250\tSeizure\n"), Some(("HP:0001250", "Seizure")));
            assert_eq!(pair("HP:0001250"), None);
            assert_eq!(pair("HP:0001250\tSeizure\textra"), None);
        }

        #[test]
        fn skips_bad_lines() {
            let s = "HP:0001250\tSeizure\nbroken line\nHP:0000505\tVisual impairment\n";
            let pairs = parse_pairs(s.as_bytes()).expect("Input is valid");
            assert_eq!(pairs.len(), 2);
            assert_eq!(pairs[1].1, "Visual impairment");
        }

        #[test]
        fn invalid_utf8() {
            let bytes: &[u8] = b"HP:0001250\tSeizure\n\xff\tbroken\n";
            assert!(matches!(
                parse_pairs(bytes),
                Err(PhenoError::InvalidInput(_))
            ));
        }

        #[test]
        fn read_files() {
            let names = read_term_names("tests/data/term_names.txt").expect("fixture exists");
            assert!(names
                .iter()
                .any(|(id, name)| id == "HP:0001250" && name == "Seizure"));

            let synonyms = read_synonyms("tests/data/synonyms.txt").expect("fixture exists");
            assert!(synonyms
                .iter()
                .any(|(synonym, id)| synonym == "Fits" && id == "HP:0001250"));
        }

        #[test]
        fn missing_file() {
            assert!(matches!(
                read_term_names("tests/data/missing.txt"),
                Err(PhenoError::CannotOpenFile(_))
            ));
        }
    }
}
