//! # Sigchain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Keys, producers and chain builders shared by everything below
//! ├── benchmarks/       # Fold and codec throughput
//! ├── exploits/         # Attack simulations
//! │   ├── tampering.rs  # Byte flips, splices, reorders, replays
//! │   ├── signers.rs    # Stolen, revoked, superseded, rolled-back and backdated keys
//! │   ├── ownership.rs  # Foreign, unrooted and hijacked chains
//! │   └── anchors.rs    # Merkle root rollback and equivocation
//! └── integration/      # End-to-end fold flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sc-tests
//!
//! # By category
//! cargo test -p sc-tests integration::
//! cargo test -p sc-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p sc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod benchmarks;
pub mod exploits;
pub mod fixtures;
pub mod integration;
