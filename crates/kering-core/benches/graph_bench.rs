//! # Graph Benchmarks
//!
//! Performance benchmarks for kering-core graph operations.
//!
//! Run with: `cargo bench -p kering-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kering_core::{
    Graph, Iri, Literal, PatternQuery, PatternTerm, Statement, TriplePattern, graph_from_turtle,
    graph_to_turtle, vocab,
};
use std::hint::black_box;

/// A graph with `parts` parts, each carrying `inspections` inspections.
fn create_inspection_graph(parts: u64, inspections: u64) -> Graph {
    let asset = vocab::asset_iri("oosterscheldekering");
    let mut graph = Graph::new();
    graph.append(Statement::new(
        asset.clone(),
        Iri::new(vocab::RDF_TYPE),
        Iri::new(vocab::STORM_SEARCH_BARRIER),
    ));

    let mut n = 0;
    for index in 0..parts {
        let part = vocab::part_iri("oosterscheldekering", index);
        graph.append(Statement::new(
            part.clone(),
            Iri::new(vocab::RDF_TYPE),
            Iri::new(vocab::PART),
        ));
        graph.append(Statement::new(
            asset.clone(),
            Iri::new(vocab::HAS_PART),
            part.clone(),
        ));
        for _ in 0..inspections {
            let inspection = vocab::inspection_iri(n);
            let score = vocab::inspection_score_iri(n);
            n += 1;
            graph.append(Statement::new(
                part.clone(),
                Iri::new(vocab::HAS_INSPECTION),
                inspection.clone(),
            ));
            graph.append(Statement::new(
                inspection.clone(),
                Iri::new(vocab::HAS_NEN2767_CONDITION),
                score.clone(),
            ));
            graph.append(Statement::new(
                score,
                Iri::new(vocab::RDF_VALUE),
                Literal::Str("Good".to_string()),
            ));
        }
    }

    graph
}

/// The five-pattern status query for one part, with the index-exact filter.
fn status_query(part_index: u64) -> PatternQuery {
    PatternQuery::new(vec![
        TriplePattern::new(
            PatternTerm::iri(vocab::asset_iri("oosterscheldekering").0),
            PatternTerm::iri(vocab::HAS_PART),
            PatternTerm::var("part"),
        ),
        TriplePattern::new(
            PatternTerm::var("part"),
            PatternTerm::iri(vocab::HAS_INSPECTION),
            PatternTerm::var("inspection"),
        ),
        TriplePattern::new(
            PatternTerm::var("inspection"),
            PatternTerm::iri(vocab::HAS_NEN2767_CONDITION),
            PatternTerm::var("condition"),
        ),
        TriplePattern::new(
            PatternTerm::var("condition"),
            PatternTerm::iri(vocab::RDF_VALUE),
            PatternTerm::var("condition_value"),
        ),
    ])
    .with_filter(kering_core::Filter::IriSuffix {
        var: "part".to_string(),
        suffix: vocab::part_filter_suffix("oosterscheldekering", part_index),
    })
    .with_select(vec!["condition_value".to_string()])
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut graph = Graph::new();
                for i in 0..size {
                    graph.append(Statement::new(
                        vocab::inspection_iri(i),
                        Iri::new(vocab::RDF_TYPE),
                        Iri::new(vocab::INSPECTION),
                    ));
                }
                black_box(graph)
            });
        });
    }

    group.finish();
}

fn bench_subject_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("subject_lookup");

    for parts in [10, 100, 1000].iter() {
        let graph = create_inspection_graph(*parts, 5);
        let subject = vocab::part_iri("oosterscheldekering", parts / 2);

        group.bench_with_input(BenchmarkId::from_parameter(parts), parts, |b, _| {
            b.iter(|| black_box(graph.statements_with_subject(&subject).count()));
        });
    }

    group.finish();
}

fn bench_status_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("status_query");

    for parts in [10, 100, 1000].iter() {
        let graph = create_inspection_graph(*parts, 5);
        let query = status_query(parts / 2);

        group.bench_with_input(BenchmarkId::from_parameter(parts), parts, |b, _| {
            b.iter(|| black_box(query.evaluate(&graph).expect("evaluate")));
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for parts in [10, 100, 1000].iter() {
        let graph = create_inspection_graph(*parts, 5);

        group.bench_with_input(BenchmarkId::from_parameter(parts), parts, |b, _| {
            b.iter(|| black_box(graph_to_turtle(&graph)));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for parts in [10, 100, 1000].iter() {
        let text = graph_to_turtle(&create_inspection_graph(*parts, 5));

        group.bench_with_input(BenchmarkId::from_parameter(parts), parts, |b, _| {
            b.iter(|| black_box(graph_from_turtle(&text).expect("parse")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_append,
    bench_subject_lookup,
    bench_status_query,
    bench_serialize,
    bench_parse,
);

criterion_main!(benches);
