use criterion::{black_box, criterion_group, criterion_main, Criterion};
use multiblock::codec::{JSON, RAW};
use multiblock::hasher::{BLAKE3, SHA2_256};
use multiblock::{Blake3, JsonCodec, RawCodec, Registry, RegistryOptions};
use std::collections::BTreeMap;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

fn bench_raw_dispatch(c: &mut Criterion) {
    let rt = runtime();
    let registry = Registry::<Vec<u8>>::with_options(
        RegistryOptions::default().codec(RawCodec).hasher(Blake3),
    );
    let data = vec![42u8; 1024 * 1024];

    c.bench_function("encode_1mb_raw_sha256", |b| {
        b.iter(|| rt.block_on(registry.encode(RAW, SHA2_256, black_box(data.clone()))).unwrap())
    });
    c.bench_function("encode_1mb_raw_blake3", |b| {
        b.iter(|| rt.block_on(registry.encode(RAW, BLAKE3, black_box(data.clone()))).unwrap())
    });
    c.bench_function("decode_1mb_raw_sha256", |b| {
        b.iter(|| rt.block_on(registry.decode(RAW, SHA2_256, black_box(data.clone()))).unwrap())
    });
}

fn bench_json_dispatch(c: &mut Criterion) {
    let rt = runtime();
    let mut registry = Registry::<BTreeMap<String, u64>>::new();
    registry.add_codec(JsonCodec);
    let value: BTreeMap<String, u64> = (0..1000).map(|i| (format!("key_{i}"), i)).collect();

    c.bench_function("encode_json_1000_keys", |b| {
        b.iter(|| rt.block_on(registry.encode(JSON, SHA2_256, black_box(value.clone()))).unwrap())
    });
}

fn bench_unknown_codec(c: &mut Criterion) {
    let rt = runtime();
    let registry = Registry::<Vec<u8>>::new();

    c.bench_function("encode_unknown_codec", |b| {
        b.iter(|| rt.block_on(registry.encode(black_box(0x99), SHA2_256, Vec::new())).is_err())
    });
}

criterion_group!(benches, bench_raw_dispatch, bench_json_dispatch, bench_unknown_codec);
criterion_main!(benches);
