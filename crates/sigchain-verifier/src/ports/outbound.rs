//! # Outbound Ports
//!
//! Read-only capabilities the verifier consumes. Implementations are shared
//! across concurrently verified chains, so every port is `Send + Sync` and
//! must not be mutated while verification runs.

use shared_crypto::Ed25519PublicKey;

use crate::domain::{
    DecryptionError, EncryptionParameters, KeyGeneration, MerkleRoot, PrincipalId,
};

/// Lookup key for a signer's verification key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignerQuery {
    /// Signing principal.
    pub principal: PrincipalId,
    /// Key generation the link claims.
    pub generation: KeyGeneration,
    /// Link creation time (seconds since epoch).
    pub at: u64,
}

/// A signer key and its lifecycle, as settled on the signer's own chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignerKeyRecord {
    /// Verification key.
    pub key: Ed25519PublicKey,
    /// Generation of this key.
    pub generation: KeyGeneration,
    /// When a later generation replaced this key, if it has been.
    pub superseded_at: Option<u64>,
    /// When this key was revoked, if it has been.
    pub revoked_at: Option<u64>,
}

/// Settled signer key state, keyed by principal and generation.
///
/// Implementations answer from already-validated state. A lookup must
/// never trigger verification of another chain.
pub trait SignerKeyProvider: Send + Sync {
    /// Key record for the queried signer and generation, if known.
    fn lookup(&self, query: &SignerQuery) -> Option<SignerKeyRecord>;
}

/// Externally supplied root of trust for merkle anchors.
///
/// Constructed once, immutable thereafter, shared by reference.
pub trait RootPublicationOracle: Send + Sync {
    /// Whether the root was actually published.
    fn is_published(&self, root: &MerkleRoot) -> bool;
}

/// Opens encrypted inner links.
pub trait InnerLinkDecryptor: Send + Sync {
    /// Decrypt the inner-link ciphertext sealed under `params`.
    ///
    /// # Errors
    ///
    /// - `UnknownKey`: no key for `params.kid`
    /// - `UnsupportedVersion`: sealing format not understood
    /// - `Failed`: authentication failed
    fn decrypt(
        &self,
        params: &EncryptionParameters,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, DecryptionError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock key provider returning one key for every signer and generation.
#[derive(Clone, Copy, Debug)]
pub struct MockSignerKeys {
    /// Key handed out for every query.
    pub key: Ed25519PublicKey,
}

impl SignerKeyProvider for MockSignerKeys {
    fn lookup(&self, query: &SignerQuery) -> Option<SignerKeyRecord> {
        Some(SignerKeyRecord {
            key: self.key,
            generation: query.generation,
            superseded_at: None,
            revoked_at: None,
        })
    }
}

/// Mock oracle with a fixed answer.
#[derive(Clone, Copy, Debug)]
pub struct MockRootOracle {
    /// Answer for every root.
    pub published: bool,
}

impl RootPublicationOracle for MockRootOracle {
    fn is_published(&self, _root: &MerkleRoot) -> bool {
        self.published
    }
}
