//! Benchmarks for path resolution and transform preview

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flowkit_core::jsonpath::JsonPath;
use flowkit_core::{
    transform_array, MapEntryValue, MappingEntry, PathResolver, ProcessorContext, TransformContext,
};
use serde_json::{json, Value};

fn create_hits(count: usize) -> Value {
    let hits: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "_id": i.to_string(),
                "_score": 1.0 / (i as f64 + 1.0),
                "_source": {
                    "title": format!("Document {}", i),
                    "body": format!("Body text for document {}", i),
                    "year": 1900 + (i % 120),
                    "tags": ["a", "b", "c"]
                }
            })
        })
        .collect();
    json!({"hits": {"total": {"value": count}, "hits": hits}})
}

fn bench_jsonpath_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("jsonpath_parse");
    for expr in [
        "$.hits.hits[0]._source.title",
        "$.hits.hits[*]._source.body",
        "$..year",
        "$.hits.hits[?(@._source.year < 1950)]._source.title",
    ] {
        group.bench_with_input(BenchmarkId::new("parse", expr), expr, |b, expr| {
            b.iter(|| black_box(JsonPath::parse(black_box(expr))))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let data = create_hits(100);
    let resolver = PathResolver::new();
    let cases = [
        ("dot_path", "hits.hits[5]._source.title", ProcessorContext::Ingest, TransformContext::Input),
        ("definite", "$.hits.hits[5]._source.title", ProcessorContext::SearchResponse, TransformContext::Output),
        ("wildcard", "$.hits.hits[*]._source.title", ProcessorContext::SearchResponse, TransformContext::Output),
        ("descendants", "$..year", ProcessorContext::SearchResponse, TransformContext::Output),
        (
            "filter",
            "$.hits.hits[?(@._source.year < 1950)]._source.title",
            ProcessorContext::SearchResponse,
            TransformContext::Output,
        ),
    ];
    for (name, path, context, transform_context) in cases {
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(resolver.resolve(black_box(&data), path, context, transform_context, None))
            })
        });
    }
    group.finish();
}

fn bench_transform_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_array");
    let map = vec![
        MappingEntry::new("titles", MapEntryValue::field("$._source.title")),
        MappingEntry::new("query", MapEntryValue::field("_request.query.match.body")),
    ];
    let query = json!({"query": {"match": {"body": "document"}}});
    for size in [10usize, 100, 1000] {
        let hits = create_hits(size);
        let docs = hits["hits"]["hits"].as_array().cloned().unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| {
                black_box(transform_array(
                    docs,
                    &map,
                    ProcessorContext::SearchResponse,
                    TransformContext::Input,
                    Some(&query),
                ))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_jsonpath_parse, bench_resolve, bench_transform_array);
criterion_main!(benches);
