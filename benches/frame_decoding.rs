//! Benchmarks for the hot decode path: framing, packet decoding, and schema
//! tree application.
//!
//! A console at 19200 baud peaks below 2KB/s, so these numbers are headroom
//! measurements rather than targets.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use courtside::sports::Basketball;
use courtside::test_utils::{build_frame, packet};
use courtside::{DecodeOptions, Framer, Packet, apply};

fn bench_framer_throughput(c: &mut Criterion) {
    // One second of typical traffic: clock updates at 10Hz plus score windows.
    let mut stream = Vec::new();
    for i in 0..10 {
        stream.extend_from_slice(&build_frame(0, format!("00:3{i}     ").as_bytes()));
        stream.extend_from_slice(&build_frame(105, b"   67   54  "));
    }

    let mut group = c.benchmark_group("framer");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    group.bench_function("feed_whole_stream", |b| {
        b.iter(|| {
            let mut framer = Framer::new();
            black_box(framer.feed(black_box(&stream)))
        })
    });

    group.bench_function("feed_byte_at_a_time", |b| {
        b.iter(|| {
            let mut framer = Framer::new();
            let mut frames = 0;
            for byte in &stream {
                frames += framer.feed(std::slice::from_ref(byte)).len();
            }
            black_box(frames)
        })
    });

    group.finish();
}

fn bench_packet_decode(c: &mut Criterion) {
    let frame = build_frame(0, b"00:30     ");
    let verify = DecodeOptions { verify_checksum: true };

    c.bench_function("packet_decode", |b| {
        b.iter(|| Packet::decode(black_box(frame.clone())).unwrap())
    });

    c.bench_function("packet_decode_verified", |b| {
        b.iter(|| Packet::decode_with(black_box(frame.clone()), &verify).unwrap())
    });
}

fn bench_schema_apply(c: &mut Criterion) {
    let clock = packet(0, b"00:30     ");
    let scores = packet(105, b"   67   54  ");

    c.bench_function("basketball_apply_clock_window", |b| {
        let mut game = Basketball::new();
        b.iter(|| black_box(apply(&mut game, black_box(&clock))))
    });

    c.bench_function("basketball_apply_score_window", |b| {
        let mut game = Basketball::new();
        b.iter(|| black_box(apply(&mut game, black_box(&scores))))
    });
}

criterion_group!(benches, bench_framer_throughput, bench_packet_decode, bench_schema_apply);
criterion_main!(benches);
