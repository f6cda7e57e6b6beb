use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use toon_codec::{decode, encode, toon, DecodeOptions, EncodeOptions, Map, Value};

fn user_rows(count: usize) -> Value {
    let rows = (0..count)
        .map(|i| {
            let mut obj = Map::new();
            obj.insert("id".to_string(), Value::from(i as i64));
            obj.insert("name".to_string(), Value::from(format!("user-{}", i)));
            obj.insert("email".to_string(), Value::from(format!("user{}@example.com", i)));
            obj.insert("active".to_string(), Value::from(i % 2 == 0));
            Value::Object(obj)
        })
        .collect();
    let mut root = Map::new();
    root.insert("users".to_string(), Value::Array(rows));
    Value::Object(root)
}

fn benchmark_encode_simple(c: &mut Criterion) {
    let value = toon!({
        "id": 123,
        "name": "Alice",
        "email": "alice@example.com",
        "active": true
    });

    c.bench_function("encode_simple_object", |b| {
        b.iter(|| encode(black_box(&value), &EncodeOptions::default()))
    });
}

fn benchmark_decode_simple(c: &mut Criterion) {
    let text = "id: 123\nname: Alice\nemail: alice@example.com\nactive: true";

    c.bench_function("decode_simple_object", |b| {
        b.iter(|| decode(black_box(text), &DecodeOptions::default()))
    });
}

fn benchmark_tabular(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabular");
    for count in [10usize, 100, 1000] {
        let value = user_rows(count);
        let text = encode(&value, &EncodeOptions::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", count), &value, |b, value| {
            b.iter(|| encode(black_box(value), &EncodeOptions::default()))
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &text, |b, text| {
            b.iter(|| decode(black_box(text), &DecodeOptions::default()))
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let value = toon!({
        "config": {
            "server": {"host": "localhost", "port": 8080},
            "limits": {"connections": 100, "timeout": 30.5}
        },
        "tags": ["alpha", "beta", "gamma"],
        "mixed": [1, "two", {"three": 3}]
    });
    let text = encode(&value, &EncodeOptions::default()).unwrap();

    c.bench_function("encode_nested", |b| {
        b.iter(|| encode(black_box(&value), &EncodeOptions::default()))
    });
    c.bench_function("decode_nested", |b| {
        b.iter(|| decode(black_box(&text), &DecodeOptions::default()))
    });
}

criterion_group!(
    benches,
    benchmark_encode_simple,
    benchmark_decode_simple,
    benchmark_tabular,
    benchmark_nested
);
criterion_main!(benches);
