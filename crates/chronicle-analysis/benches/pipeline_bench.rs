// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use std::hint::black_box;
use std::sync::Arc;

use chronicle_analysis::{AnalysisPipeline, OfflineProvider};
use chronicle_git::Commit;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::stream::{self, StreamExt};

fn sample_commits(count: usize) -> Vec<Commit> {
    (0..count)
        .map(|i| {
            Commit::new(format!("{i:07x}"), format!("feat: change number {i}"))
                .with_author(format!("Author {}", i % 10))
                .with_body("Body line one\nBody line two")
        })
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

fn offline_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("offline");

    let commits = sample_commits(1);
    group.bench_function("describe", |b| {
        b.iter(|| OfflineProvider::describe(black_box(&commits[0])))
    });

    group.finish();
}

fn pipeline_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let rt = runtime();
    let commits = sample_commits(1_000);

    for concurrency in [1, 8, 64] {
        let pipeline =
            AnalysisPipeline::new(Arc::new(OfflineProvider::new())).concurrency(concurrency);

        group.bench_with_input(
            BenchmarkId::new("batch", concurrency),
            &commits,
            |b, commits| {
                b.iter(|| {
                    rt.block_on(pipeline.analyze(commits.clone()))
                        .expect("offline analysis")
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("stream", concurrency),
            &commits,
            |b, commits| {
                b.iter(|| {
                    rt.block_on(async {
                        let input = stream::iter(
                            commits.iter().cloned().map(Ok::<_, chronicle_analysis::AnalysisError>),
                        );
                        pipeline.analyze_stream(input).count().await
                    })
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, offline_benchmarks, pipeline_benchmarks);
criterion_main!(benches);
