//! Benchmark – contract parsing and serialization over a coordinate corpus.
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsonbind::{
    from_json_array, json_contract, json_value, minify_json, to_json, JsonClass,
    JsonArrayIterator,
};

#[derive(Debug, Clone, PartialEq)]
struct Coordinate {
    x: f64,
    y: f64,
    z: f64,
}

json_contract! {
    struct Coordinate {
        x: "x" => real,
        y: "y" => real,
        z: "z" => real,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Coordinates {
    coordinates: Vec<Coordinate>,
}

json_contract! {
    struct Coordinates {
        coordinates: "coordinates" => array(class(Coordinate)),
    }
}

/// Deterministic corpus in the shape of the classic coordinate benchmarks:
/// `{"coordinates":[{"x":…,"y":…,"z":…},…]}`.
fn make_payload(count: usize) -> String {
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 1_000_000) as f64 / 1_000.0
    };
    let mut out = String::from("{\"coordinates\":[");
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"x\":{},\"y\":{},\"z\":{}}}",
            next(),
            next(),
            next()
        ));
    }
    out.push_str("]}");
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinates_parse");
    for &count in &[100usize, 1_000, 10_000] {
        let payload = make_payload(count);
        group.bench_with_input(
            BenchmarkId::new("contract", count),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let doc: Coordinates = jsonbind::from_json(black_box(payload)).unwrap();
                    black_box(doc.coordinates.len());
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("iterator", count),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let root = json_value(black_box(payload)).unwrap();
                    let coords = root.find_member("coordinates").unwrap().unwrap();
                    let mut sum = 0.0;
                    for item in
                        JsonArrayIterator::<JsonClass<Coordinate>>::new(coords.as_raw_text())
                            .unwrap()
                    {
                        sum += item.unwrap().x;
                    }
                    black_box(sum);
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("serde_json", count),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let doc: serde_json::Value =
                        serde_json::from_str(black_box(payload)).unwrap();
                    black_box(doc["coordinates"].as_array().unwrap().len());
                });
            },
        );
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let payload = make_payload(1_000);
    let doc: Coordinates = jsonbind::from_json(&payload).unwrap();
    let elements = from_json_array::<JsonClass<Coordinate>>(
        json_value(&payload)
            .unwrap()
            .find_member("coordinates")
            .unwrap()
            .unwrap()
            .as_raw_text(),
    )
    .unwrap();
    assert_eq!(elements.len(), doc.coordinates.len());

    let mut group = c.benchmark_group("coordinates_write");
    group.bench_function("to_json", |b| {
        b.iter(|| {
            black_box(to_json(black_box(&doc)).len());
        });
    });
    group.bench_function("minify", |b| {
        b.iter(|| {
            black_box(minify_json(black_box(&payload)).unwrap().len());
        });
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_parse, bench_serialize }
criterion_main!(benches);
