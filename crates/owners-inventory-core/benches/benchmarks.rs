//! Benchmarks for owners-inventory-core
//!
//! Run with: cargo bench -p owners-inventory-core --features generate
//!
//! Filter benchmarks:
//!   cargo bench -- "parsing"
//!   cargo bench -- "aggregate"
//!   cargo bench -- "source/local"

use owners_inventory_core::aggregate::{aggregate, aggregate_source};
use owners_inventory_core::parse::parse_owners;
use owners_inventory_core::source::{LocalSource, OwnersSource};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::collections::HashMap;

use fixtures::{fixtures, fixtures_extended, repo_path, total_bytes};

/// Benchmark parsing every file of each fixture
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for (name, repository) in fixtures() {
        group.throughput(Throughput::Bytes(total_bytes(repository)));
        group.bench_with_input(
            BenchmarkId::new("parse_owners", name),
            repository,
            |b, repository| {
                b.iter(|| {
                    for (_, content) in repository.iter() {
                        std::hint::black_box(parse_owners(std::hint::black_box(content)));
                    }
                })
            },
        );
    }
    group.finish();
}

/// Benchmark in-memory aggregation, including extended sizes
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(10); // Fewer samples for large trees

    for (name, repository) in fixtures_extended() {
        let contents: HashMap<&str, &str> = repository
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
            .collect();

        group.throughput(Throughput::Elements(repository.len() as u64));
        group.bench_with_input(BenchmarkId::new("aggregate", name), repository, |b, repository| {
            b.iter(|| {
                aggregate(repository.iter().map(|(path, _)| path), |path| {
                    contents.get(path).map(|content| content.to_string())
                })
            })
        });
    }
    group.finish();
}

/// Benchmark discovery and aggregation over a tree on disk
fn bench_local_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("source/local");
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let source = LocalSource::new(repo_path());

    group.bench_function("discover", |b| {
        b.iter(|| runtime.block_on(source.discover()))
    });

    for concurrency in [1, 8] {
        group.bench_with_input(
            BenchmarkId::new("aggregate_source", concurrency),
            &concurrency,
            |b, &concurrency| b.iter(|| runtime.block_on(aggregate_source(&source, concurrency))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parsing, bench_aggregate, bench_local_source);
criterion_main!(benches);
