use std::path::Path;

use simple_logger::SimpleLogger;

use phenorank::annotations::{AnnotationConfig, DiseaseRecord};
use phenorank::extract::DictionaryExtractor;
use phenorank::parser::{disease_json, hp_obo, phenotype_hpoa};
use phenorank::Engine;

/// Threshold below which the best match is reported as a rare or novel condition
const DEFAULT_THRESHOLD: f64 = 0.2;

/// Number of diseases shown
const TOP_N: usize = 10;

/// Reads disease annotations either from `phenotype.hpoa` or from the JSON cache
fn read_diseases(path_arg: &str) -> Vec<DiseaseRecord> {
    let path = Path::new(path_arg);
    if path.extension().is_some_and(|ext| ext == "hpoa") {
        phenotype_hpoa::read_hpoa_file(path).expect("Unable to read annotations")
    } else {
        disease_json::read_disease_json(path).expect("Unable to read annotations")
    }
}

fn main() {
    SimpleLogger::new().env().init().unwrap();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 6 {
        panic!(
            "Usage: ./rank_text /path/to/hp.obo /path/to/disease_data.json /path/to/term_names.txt /path/to/synonyms.txt \"clinical description\" [threshold]"
        );
    }

    let terms = hp_obo::read_obo_file(&args[1]).expect("Unable to read ontology");
    let diseases = read_diseases(&args[2]);
    let extractor =
        DictionaryExtractor::from_files(&args[3], &args[4]).expect("Unable to read dictionary");
    let text = &args[5];
    let threshold = args
        .get(6)
        .map(|value| value.parse::<f64>().expect("Threshold must be a number"))
        .unwrap_or(DEFAULT_THRESHOLD);

    let (engine, report) = Engine::load(terms, diseases, &AnnotationConfig::default())
        .expect("The ontology is malformed");
    println!(
        "Loaded {} diseases, skipped {}",
        report.accepted(),
        report.skipped()
    );
    for issue in report.issues() {
        println!("  {issue}");
    }

    let ranking = engine
        .rank_text(&extractor, text, threshold)
        .expect("Extracted terms must be part of the ontology");

    println!("Query terms: {}", ranking.query_len());
    for (disease, normalized) in ranking
        .top(TOP_N)
        .iter()
        .zip(ranking.normalized_scores())
    {
        println!(
            "{}\t{}\t{:.4}\t{:.4}",
            disease.id(),
            disease.name(),
            disease.score(),
            normalized
        );
    }

    if ranking.is_rare() {
        println!("No disease matches well, this might be a rare or novel condition");
    }
}
