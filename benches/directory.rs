// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use streamwall::directory::{Directory, SearchOptions};
use streamwall::store::load_catalogues;

mod fixtures;
mod profiler;

fn benches_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory.ingest");
    for count in [500usize, 5_000] {
        let records = fixtures::records(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("records_{count}"), |b| {
            b.iter_batched(
                || records.clone(),
                |records| black_box(Directory::from_records(records).len()),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();

    let temp = fixtures::TempDir::new("catalogues");
    let paths = fixtures::catalogue_files(temp.path(), 8, 500);
    let mut group = c.benchmark_group("directory.load_catalogues");
    group.throughput(Throughput::Elements(4_000));
    group.bench_function("files_8x500", |b| {
        b.iter(|| {
            let mut directory = Directory::new();
            let summary = load_catalogues(black_box(&paths), &mut directory).expect("load");
            black_box(summary.created)
        })
    });
    group.finish();

    let directory = fixtures::directory(5_000);
    let options = SearchOptions::default();
    let terms = ["holo", "myth"];
    let mut group = c.benchmark_group("directory.search");
    group.bench_function("prefix_two_terms", |b| {
        b.iter(|| black_box(directory.search(black_box(&terms[..]), options).len()))
    });
    group.bench_function("ranked_typo", |b| {
        b.iter(|| {
            black_box(directory.search_ranked(black_box("nijisnaji advnet"), 20, options).len())
        })
    });
    group.bench_function("listing", |b| b.iter(|| black_box(directory.listing().len())));
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_directory
}
criterion_main!(benches);
