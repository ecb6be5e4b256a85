//! # Exploit Simulations
//!
//! Attacks against chain verification, grouped by what the attacker
//! controls: the bytes, the signing keys, the merkle anchors, or a chain
//! that is not theirs.

pub mod anchors;
pub mod ownership;
pub mod signers;
