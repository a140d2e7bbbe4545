use criterion::{black_box, criterion_group, criterion_main, Criterion};

use phenorank::{Ontology, TermRecord};

/// A complete binary tree, every term except the root has one parent
fn binary_tree(depth: u32) -> Vec<TermRecord> {
    let n = 2usize.pow(depth) - 1;
    (1..=n)
        .map(|i| {
            let record = TermRecord::new(format!("T:{i}"), &format!("Term {i}"));
            if i == 1 {
                record
            } else {
                record.with_parent(format!("T:{}", i / 2))
            }
        })
        .collect()
}

fn common_ancestors(ontology: &Ontology, times: usize) -> usize {
    let mut count = 0;
    for term1 in ontology.iter().skip(100).take(times) {
        for term2 in ontology.iter().skip(300).take(times) {
            let overlap = term1.ancestors().filter(|a| term2.is_a(a)).count();
            if overlap > count {
                count = overlap;
            }
        }
    }
    count
}

fn load_benchmark(c: &mut Criterion) {
    let records = binary_tree(12);
    c.bench_function("load 4095 terms", |b| {
        b.iter(|| Ontology::load(black_box(records.clone())).unwrap())
    });
}

fn ancestors_benchmark(c: &mut Criterion) {
    let ontology = Ontology::load(binary_tree(12)).unwrap();
    c.bench_function("common-ancestors 200", |b| {
        b.iter(|| common_ancestors(black_box(&ontology), black_box(200)))
    });
}

criterion_group!(ancestors, load_benchmark, ancestors_benchmark);
criterion_main!(ancestors);
