use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use json2::{from_str, to_debug_string, to_string, to_value, Binary, Object, Value};
use serde::Serialize;

#[derive(Serialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Value {
    let products: Vec<Product> = (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect();
    to_value(&products).unwrap()
}

fn binary_record(bytes: usize) -> Value {
    let record = Object::new();
    record.insert("id", Value::from(7));
    record.insert("payload", Value::from(Binary::Buffer(vec![0xab; bytes])));
    record.insert(
        "samples",
        Value::from(Binary::Float32Array((0..bytes).map(|i| i as f32 * 0.5).collect())),
    );
    Value::Object(record)
}

fn benchmark_encode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_array");

    for size in [10, 50, 100, 500].iter() {
        let value = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&value)))
        });
    }
    group.finish();
}

fn benchmark_decode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_str(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");

    for bytes in [64, 1024, 16384].iter() {
        let value = binary_record(*bytes);
        let text = to_string(&value).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", bytes), bytes, |b, _| {
            b.iter(|| to_string(black_box(&value)))
        });
        group.bench_with_input(BenchmarkId::new("decode", bytes), bytes, |b, _| {
            b.iter(|| from_str(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_debug(c: &mut Criterion) {
    let value = binary_record(4096);
    let shared = Object::new();
    shared.insert("record", value.clone());
    shared.insert("again", value);
    let graph = Value::Object(shared);

    c.bench_function("debug_render_shared", |b| {
        b.iter(|| to_debug_string(black_box(&graph)))
    });
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let value = products(50);

    c.bench_function("roundtrip_products", |b| {
        b.iter(|| {
            let text = to_string(black_box(&value)).unwrap();
            let _decoded = from_str(black_box(&text)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_encode_array,
    benchmark_decode_array,
    benchmark_binary,
    benchmark_debug,
    benchmark_roundtrip
);
criterion_main!(benches);
