//! # Shared Crypto - Sigchain Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | LinkIDs, inner-link attestation |
//! | `signatures` | Ed25519 | Outer-link signatures |
//! | `symmetric` | XChaCha20-Poly1305 | Sealed (encrypted) inner links |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, strict verification (no malleable signatures)
//! - **XChaCha20**: 192-bit nonce, constant-time, side-channel immune
//! - **SHA-256**: Fixed 32-byte digests; LinkIDs are never truncated

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, Hash};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use symmetric::{decrypt, encrypt, encrypt_with_nonce, Nonce, SecretKey, NONCE_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
