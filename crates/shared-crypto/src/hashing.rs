//! # SHA-256 Hashing
//!
//! Link identities and inner-link attestations are SHA-256 digests of the
//! exact bytes that travel on the wire.

use sha2::{Digest, Sha256};

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}
