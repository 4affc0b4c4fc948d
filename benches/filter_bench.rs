//! Criterion benchmarks for the filter hot path: expression compilation,
//! direct evaluation, and compiled-policy matching against event wire forms.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use docweave::compiler::compile;
use docweave::evaluator::evaluate;
use docweave::types::{DocumentRef, Event, FilterExpression, Metadata};

fn sample_event() -> Event {
  let mut event = Event::new(
    DocumentRef::new("s3://bucket/report.txt", "text/plain").expect("valid document"),
  );
  event.payload_mut().merge_metadata(
    &Metadata::from_value(json!({
      "language": "en",
      "pages": 24,
      "confidence": 0.92,
      "title": "Quarterly Report",
      "topics": ["finance", "forecast"],
    }))
    .expect("object"),
  );
  event.derived("ocr").derived("nlp")
}

/// A conjunction with `leaves` comparisons, every one matching `sample_event`.
fn expression_with(leaves: usize) -> FilterExpression {
  let pool = [
    FilterExpression::equals("payload.metadata.language", "en"),
    FilterExpression::gte("payload.metadata.pages", 10.0),
    FilterExpression::lt("payload.metadata.confidence", 1.0),
    FilterExpression::starts_with("payload.metadata.title", "Quarterly"),
    FilterExpression::includes("payload.metadata.topics", "finance"),
    FilterExpression::equals("payload.currentDocument.mediaType", "text/plain"),
  ];
  FilterExpression::all((0..leaves).map(|i| pool[i % pool.len()].clone()))
}

fn bench_compile(c: &mut Criterion) {
  let mut group = c.benchmark_group("filter/compile");
  for leaves in [1, 4, 16] {
    let expr = expression_with(leaves);
    group.bench_with_input(BenchmarkId::from_parameter(leaves), &expr, |b, expr| {
      b.iter(|| black_box(compile(expr)));
    });
  }
  group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
  let mut group = c.benchmark_group("filter/evaluate");
  let event = sample_event();
  for leaves in [1, 4, 16] {
    let expr = expression_with(leaves);
    group.bench_with_input(BenchmarkId::from_parameter(leaves), &expr, |b, expr| {
      b.iter(|| black_box(evaluate(expr, &event)));
    });
  }
  group.finish();
}

fn bench_policy_match(c: &mut Criterion) {
  let mut group = c.benchmark_group("filter/policy_match");
  let wire = sample_event().wire_value();
  for leaves in [1, 4, 16] {
    let policy = compile(&expression_with(leaves));
    group.bench_with_input(BenchmarkId::from_parameter(leaves), &policy, |b, policy| {
      b.iter(|| black_box(policy.matches_value(&wire)));
    });
  }
  group.finish();
}

fn bench_wire_codec(c: &mut Criterion) {
  let event = sample_event();
  let wire = event.to_wire();

  c.bench_function("wire/serialize", |b| {
    b.iter(|| black_box(event.to_wire()));
  });
  c.bench_function("wire/parse", |b| {
    b.iter(|| black_box(Event::from_wire(wire.as_bytes()).expect("well formed")));
  });
}

criterion_group!(
  benches,
  bench_compile,
  bench_evaluate,
  bench_policy_match,
  bench_wire_codec
);
criterion_main!(benches);
