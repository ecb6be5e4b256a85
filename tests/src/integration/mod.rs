//! # Integration Tests
//!
//! End-to-end flows through the public verifier API.

pub mod flows;
