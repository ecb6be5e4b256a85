//! # Sigchain Benchmarks
//!
//! Performance benchmarks for the verifier.
//! All benchmarks are "brutal" stress tests: long chains, many chains,
//! adversarial input.

pub mod fold;
