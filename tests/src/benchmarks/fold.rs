//! # Fold Brutal Benchmarks
//!
//! Conditions:
//! - Long single chains (signature verification dominates)
//! - Many independent chains, sequential vs. `verify_many`
//! - Chains rejected at the last link (full work, no result)

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use sigchain_verifier::{ChainBatch, SigchainVerifierApi};
use std::time::Duration;

use crate::fixtures::{user_chain, verifier, ALICE};

/// Fold single chains of increasing length.
pub fn brutal_single_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("sigchain-fold");
    group.measurement_time(Duration::from_secs(10));
    let verifier = verifier();

    for len in [1usize, 16, 128, 512] {
        let links = user_chain(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("fold_chain", len), &links, |b, links| {
            b.iter(|| black_box(verifier.fold_chain(links)))
        });
    }

    let mut rejected = user_chain(128);
    if let Some(last) = rejected.last_mut() {
        last.sig[0] ^= 0x01;
    }
    group.bench_function("fold_chain_rejected_at_tail", |b| {
        b.iter(|| black_box(verifier.fold_chain(&rejected)))
    });

    group.finish();
}

/// Fold many independent chains sequentially and in parallel.
pub fn brutal_many_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("sigchain-verify-many");
    group.measurement_time(Duration::from_secs(10));
    let verifier = verifier();

    for count in [8usize, 64, 256] {
        let batches: Vec<ChainBatch> = (0..count)
            .map(|_| ChainBatch::new(ALICE, user_chain(16)))
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), &batches, |b, batches| {
            b.iter(|| {
                let results: Vec<_> = batches
                    .iter()
                    .map(|batch| verifier.fold_batch(batch))
                    .collect();
                black_box(results)
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), &batches, |b, batches| {
            b.iter(|| black_box(verifier.verify_many(batches)))
        });
    }

    group.finish();
}
