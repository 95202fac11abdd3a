#![allow(clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use domsift_core::{collapse_covered, DomainRecord, Pipeline, SourceFormat};

fn make_records(n: usize) -> Vec<DomainRecord> {
    (0..n)
        .filter_map(|i| {
            let domain = match i % 4 {
                0 => format!("site{}.example{}.com", i, i % 97),
                1 => format!("ads.site{}.example{}.com", i - 1, (i - 1) % 97),
                2 => format!("example{}.com", i % 97),
                _ => format!("cdn{}.example{}.net", i, i % 31),
            };
            DomainRecord::new(domain, i % 3 == 0)
        })
        .collect()
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse_covered");

    for &n in &[1_000, 10_000, 100_000] {
        let records = make_records(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter_batched(
                || records.clone(),
                |records| collapse_covered(black_box(records)),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let lines: Vec<String> = (0..10_000)
        .map(|i| match i % 3 {
            0 => format!("||ads{i}.example.com^"),
            1 => format!("0.0.0.0 tracker{}.example.org", i / 2),
            _ => format!("DOMAIN-SUFFIX,cdn{i}.example.net,REJECT"),
        })
        .collect();

    c.bench_function("pipeline_process_10k", |b| {
        let pipeline = Pipeline::new(SourceFormat::Generic);
        b.iter(|| pipeline.process(black_box(&lines)));
    });
}

criterion_group!(benches, bench_collapse, bench_pipeline);
criterion_main!(benches);
