//! # Sigchain Verifier Benchmarks
//!
//! | Area | Benchmark |
//! |------|-----------|
//! | Codec | canonical decode, garbage rejection, link id |
//! | Fold | single chains up to 512 links, rejection at tail |
//! | Parallelism | `verify_many` vs. sequential over independent chains |

use criterion::{criterion_group, criterion_main};
use sc_tests::benchmarks::{codec, fold};

criterion_group!(
    benches,
    codec::brutal_decode,
    codec::brutal_garbage,
    fold::brutal_single_chain,
    fold::brutal_many_chains,
);

criterion_main!(benches);
