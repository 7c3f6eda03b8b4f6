//! Drive throughput under a synthetic trace, for both shipped policies.
//!
//! Grounded on the teacher crate's `benches/benchmarks.rs` shape:
//! Criterion groups, one per scenario, with `Throughput::Elements` set
//! to the number of logical-address operations replayed.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

use ftlsim::drive::Drive;
use ftlsim::policy::{IdentityPolicy, MidaPolicy};
use ftlsim::trace::TraceRecord;

fn synthetic_trace(lba_size: usize, num_streams: usize, records: usize) -> Vec<TraceRecord> {
    (0..records)
        .map(|i| TraceRecord {
            addr: (i * 7) % lba_size,
            length: 1,
            stream_hint: Some(i % num_streams),
        })
        .collect()
}

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("drive_identity");
    for &lba_size in &[4_096usize, 16_384] {
        let trace = synthetic_trace(lba_size, 4, 20_000);
        group.throughput(Throughput::Elements(trace.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lba_size), &lba_size, |b, &lba_size| {
            b.iter_batched(
                || Drive::new(lba_size, 50.0, 4, IdentityPolicy::new(4)),
                |mut drive| {
                    drive.run(trace.clone().into_iter());
                    drive.waf()
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_mida(c: &mut Criterion) {
    let mut group = c.benchmark_group("drive_mida");
    for &lba_size in &[4_096usize, 16_384] {
        let trace = synthetic_trace(lba_size, 4, 20_000);
        group.throughput(Throughput::Elements(trace.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lba_size), &lba_size, |b, &lba_size| {
            b.iter_batched(
                || Drive::new(lba_size, 50.0, 4, MidaPolicy::new(4)),
                |mut drive| {
                    drive.run(trace.clone().into_iter());
                    drive.waf()
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_identity, bench_mida);
criterion_main!(benches);
