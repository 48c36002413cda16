//! Classification pipeline benchmarks.
//!
//! Measures parsing plus classification of synthetic isolate tables.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use amrscope::{AmrScope, CategoryConfig, Parser};

/// Generate an isolate table over the standard panel with a deterministic
/// mix of R/S/I calls and missing values.
fn generate_isolates(rows: usize) -> String {
    let drugs = CategoryConfig::standard().required_drugs();
    let mut data = String::from("isolate_id");
    for drug in &drugs {
        data.push('\t');
        data.push_str(drug);
    }
    data.push('\n');

    for row in 0..rows {
        data.push_str(&format!("ISO{:06}", row + 1));
        for (col, _) in drugs.iter().enumerate() {
            let code = match (row * 7 + col * 13) % 11 {
                0 | 1 | 2 => "R",
                3 => "I",
                4 => "NA",
                _ => "S",
            };
            data.push('\t');
            data.push_str(code);
        }
        data.push('\n');
    }

    data
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let scope = AmrScope::new();
    let parser = Parser::new();

    for rows in [100, 1_000, 10_000] {
        let table = parser
            .parse_bytes(generate_isolates(rows).as_bytes())
            .expect("table parses");

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| scope.classify(black_box(table)).expect("classifies"))
        });
    }

    group.finish();
}

fn bench_parse_and_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_classify");
    let scope = AmrScope::new();
    let parser = Parser::new();

    for rows in [1_000, 10_000] {
        let data = generate_isolates(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let table = parser.parse_bytes(black_box(data.as_bytes())).expect("parses");
                scope.classify(&table).expect("classifies")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_parse_and_classify);
criterion_main!(benches);
