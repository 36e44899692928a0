//! Performance benchmarks for frame building and reply decoding.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench frame_bench
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lockbank_core::{BoardAddress, DoorNumber, LockAddress};
use lockbank_protocol::{CommandFrame, CommandType, QueryAllReply, decode_door_states};
use std::hint::black_box;

/// Benchmark building a frame for every command type.
fn bench_build_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_frames");
    group.throughput(Throughput::Elements(CommandType::ALL.len() as u64));

    group.bench_function("for_command", |b| {
        b.iter(|| {
            for command in CommandType::ALL {
                black_box(CommandFrame::for_command(
                    black_box(command),
                    BoardAddress::SINGLE_BOARD,
                    LockAddress::new(black_box(12)),
                ));
            }
        });
    });

    group.finish();
}

/// Benchmark decoding a "query all" reply into bit strings and door states.
fn bench_decode_query_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_query_all");
    group.throughput(Throughput::Elements(1));

    let reply = [0x80, 0x01, 0x01, 0x01, 0x01, 0x33, 0xB3];

    group.bench_function("decode_door_states", |b| {
        b.iter(|| {
            let groups = decode_door_states(black_box(&reply)).unwrap();
            black_box(groups.iter().map(ToString::to_string).collect::<Vec<_>>());
        });
    });

    group.bench_function("door_bank", |b| {
        b.iter(|| {
            let bank = QueryAllReply::parse(black_box(&reply)).unwrap().door_bank();
            black_box(bank.state(DoorNumber::new(17).unwrap()));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build_frames, bench_decode_query_all);
criterion_main!(benches);
