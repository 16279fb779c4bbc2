//! Encode and decode throughput over full and shortened byte-symbol blocks

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rscodec::{Decoded, RsCodec};
use std::hint::black_box;

fn full_block(codec: &RsCodec) -> (Vec<u16>, Vec<u16>) {
    let data: Vec<u16> = (0..codec.capacity()).map(|i| (i % 255) as u16).collect();
    let mut parity = vec![0u16; codec.nroots()];
    codec.encode(&data, &mut parity).unwrap();
    (data, parity)
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_full_block");
    for nroots in [4usize, 16, 32] {
        let codec = RsCodec::for_symbol_bits(8, nroots).unwrap();
        let data: Vec<u16> = (0..codec.capacity()).map(|i| (i % 255) as u16).collect();
        group.bench_with_input(BenchmarkId::from_parameter(nroots), &nroots, |b, _| {
            let mut parity = vec![0u16; codec.nroots()];
            b.iter(|| {
                codec.encode(black_box(&data), &mut parity).unwrap();
                black_box(parity[0])
            });
        });
    }
    group.finish();
}

fn bench_decode_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_clean");
    for nroots in [4usize, 16, 32] {
        let codec = RsCodec::for_symbol_bits(8, nroots).unwrap();
        let (data, parity) = full_block(&codec);
        group.bench_with_input(BenchmarkId::from_parameter(nroots), &nroots, |b, _| {
            b.iter_batched(
                || (data.clone(), parity.clone()),
                |(mut data, mut parity)| {
                    let outcome = codec.decode(&mut data, &mut parity).unwrap();
                    assert_eq!(outcome, Decoded::Clean);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_decode_with_errors(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_at_error_budget");
    for nroots in [4usize, 16, 32] {
        let codec = RsCodec::for_symbol_bits(8, nroots).unwrap();
        let (data, parity) = full_block(&codec);

        // Spread t errors across the block.
        let mut corrupted = data.clone();
        let t = nroots / 2;
        for e in 0..t {
            corrupted[e * codec.capacity() / t] ^= 0x5a;
        }

        group.bench_with_input(BenchmarkId::from_parameter(nroots), &nroots, |b, _| {
            b.iter_batched(
                || (corrupted.clone(), parity.clone()),
                |(mut data, mut parity)| {
                    match codec.decode(&mut data, &mut parity).unwrap() {
                        Decoded::Corrected(c) => assert_eq!(c.len(), t),
                        other => panic!("unexpected outcome: {:?}", other),
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_decode_shortened(c: &mut Criterion) {
    // A mostly-padded block: 13 data symbols in the 255-symbol code.
    let codec = RsCodec::for_symbol_bits(8, 4).unwrap();
    let data: Vec<u16> = b"Hello, world!".iter().map(|&b| b as u16).collect();
    let mut parity = vec![0u16; 4];
    codec.encode(&data, &mut parity).unwrap();

    let mut corrupted = data.clone();
    corrupted[0] ^= 0xff;
    corrupted[5] ^= 0x42;

    c.bench_function("decode_shortened_two_errors", |b| {
        b.iter_batched(
            || (corrupted.clone(), parity.clone()),
            |(mut data, mut parity)| {
                match codec.decode(&mut data, &mut parity).unwrap() {
                    Decoded::Corrected(c) => assert_eq!(c.len(), 2),
                    other => panic!("unexpected outcome: {:?}", other),
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode_clean,
    bench_decode_with_errors,
    bench_decode_shortened
);
criterion_main!(benches);
