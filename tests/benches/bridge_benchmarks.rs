//! # Keygate Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | kg-01 | Build a call target | < 10µs |
//! | kg-01 | Parse a 1,000-key response script | < 5ms |
//! | kg-02 | Search 10,000 keys | < 5ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kg_01_bridge::{CallBuilder, CallParams, Operation, ScriptResponse};
use kg_02_key_admin::{KeyCollection, KeySource};
use serde_json::json;
use shared_types::KeyRecord;

fn bench_call_builder(c: &mut Criterion) {
    let builder = CallBuilder::new("https://script.example.com/macros/s/deployment/exec", "secret")
        .expect("valid base url");
    let params = CallParams::new()
        .with("key", "VIP-KEY-2024")
        .with("expire_days", 365u32)
        .with("notes", "renewal & upgrade = yes");

    c.bench_function("kg-01/build_target", |b| {
        b.iter(|| builder.build(black_box(Operation::AddKey), black_box(&params)))
    });
}

fn bench_script_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("kg-01/parse_script");

    for count in [10usize, 100, 1_000] {
        let keys: Vec<_> = (0..count)
            .map(|i| json!({"key": format!("KEY-{:05}", i), "expire_date": "2030-01-01", "status": "active"}))
            .collect();
        let body = ScriptResponse::render("kgcb_1_1700000000000", &json!({"success": true, "keys": keys}));

        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &body, |b, body| {
            b.iter(|| ScriptResponse::parse(black_box(body)))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let records: Vec<KeyRecord> = (0..10_000)
        .map(|i| KeyRecord::new(format!("KEY-{:05}", i), "2030-01-01", format!("customer {}", i % 97), "2024-01-01"))
        .collect();
    let mut collection = KeyCollection::new();
    collection.replace(records, KeySource::Remote);

    c.bench_function("kg-02/search_10k", |b| {
        b.iter(|| collection.search(black_box("customer 42")))
    });
}

criterion_group!(benches, bench_call_builder, bench_script_parse, bench_search);
criterion_main!(benches);
