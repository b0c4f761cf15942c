//! Benchmarks for line encoding
//!
//! Measures `encode_entry` for both formats on a typical request line and on
//! a line with values that need escaping or flattening.

use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use lumber_encoding::{
    Caller, EncoderConfig, EncoderPool, Field, Level, LogEvent, OutputFormat, new_encoder,
};

fn typical_fields() -> Vec<Field> {
    vec![
        Field::new("method", "GET"),
        Field::new("path", "/api/v1/users/42"),
        Field::new("status", 200u16),
        Field::new("latency", Duration::from_micros(1830)),
        Field::new("bytes", 5123u64),
    ]
}

fn awkward_fields() -> Vec<Field> {
    vec![
        Field::new("query", "name = \"o'brien\", city = \"zürich\"\n"),
        Field::byte_string("raw", vec![b'o', 0xff, b'k', 0x00]),
        Field::new("ids", vec![1u32, 2, 3, 4, 5]),
        Field::object("user", vec![Field::new("id", 7i64), Field::new("admin", false)]),
        Field::complex128("z", 1.5, -2.0),
    ]
}

fn bench_encode_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_entry");
    let pool = Arc::new(EncoderPool::default());
    let caller = Caller {
        file: "src/handlers/users.rs",
        line: 88,
    };

    for format in [OutputFormat::Csv, OutputFormat::Json] {
        let encoder = new_encoder(format, EncoderConfig::default(), Arc::clone(&pool));

        for (name, fields) in [("typical", typical_fields()), ("awkward", awkward_fields())] {
            let event = LogEvent::new(Level::Info, "request served")
                .with_caller(caller)
                .with_fields(&fields);

            group.throughput(Throughput::Elements(1));
            group.bench_function(format!("{format}_{name}"), |b| {
                b.iter(|| {
                    let line = encoder.encode_entry(black_box(&event));
                    encoder.recycle(black_box(line));
                })
            });
        }
    }

    group.finish();
}

fn bench_context_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_clone");
    let mut base = new_encoder(
        OutputFormat::Csv,
        EncoderConfig::default(),
        Arc::new(EncoderPool::default()),
    );
    base.add_fields(&[Field::new("service", "billing"), Field::new("region", "eu-west-1")]);

    group.bench_function("with_request_id", |b| {
        b.iter(|| {
            let mut child = base.clone();
            child.add_fields(&[Field::new("request_id", black_box(42u64))]);
            black_box(child)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_encode_entry, bench_context_clone);
criterion_main!(benches);
