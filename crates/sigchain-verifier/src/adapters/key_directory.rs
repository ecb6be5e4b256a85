//! In-memory signer key directory.
//!
//! Holds settled key lifecycles for signers whose own chains have already
//! been verified. Populate it first, then share it behind an `Arc`; the
//! verifier only ever reads it.

use std::collections::BTreeMap;

use shared_crypto::Ed25519PublicKey;

use crate::domain::{KeyGeneration, PrincipalId};
use crate::ports::{SignerKeyProvider, SignerKeyRecord, SignerQuery};

/// Signer keys by principal and generation.
#[derive(Clone, Debug, Default)]
pub struct KeyDirectory {
    records: BTreeMap<(PrincipalId, KeyGeneration), SignerKeyRecord>,
}

impl KeyDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key for `principal` at `generation`.
    ///
    /// Replaces any record already held for that pair.
    pub fn register(
        &mut self,
        principal: PrincipalId,
        generation: KeyGeneration,
        key: Ed25519PublicKey,
    ) -> &mut Self {
        self.records.insert(
            (principal, generation),
            SignerKeyRecord {
                key,
                generation,
                superseded_at: None,
                revoked_at: None,
            },
        );
        self
    }

    /// Register the next generation at time `at`, superseding the one
    /// before it. Returns the new generation.
    pub fn rotate(&mut self, principal: PrincipalId, key: Ed25519PublicKey, at: u64) -> KeyGeneration {
        let next = match self.latest_generation(&principal) {
            Some(current) => {
                self.supersede(principal, current, at);
                current.next().unwrap_or(current)
            }
            None => KeyGeneration::FIRST,
        };
        self.register(principal, next, key);
        next
    }

    /// Mark a key superseded from `at` onwards. Returns false if unknown.
    pub fn supersede(&mut self, principal: PrincipalId, generation: KeyGeneration, at: u64) -> bool {
        match self.records.get_mut(&(principal, generation)) {
            Some(record) => {
                record.superseded_at = Some(at);
                true
            }
            None => false,
        }
    }

    /// Mark a key revoked from `at` onwards. Returns false if unknown.
    pub fn revoke(&mut self, principal: PrincipalId, generation: KeyGeneration, at: u64) -> bool {
        match self.records.get_mut(&(principal, generation)) {
            Some(record) => {
                record.revoked_at = Some(at);
                true
            }
            None => false,
        }
    }

    /// Highest generation registered for a principal.
    pub fn latest_generation(&self, principal: &PrincipalId) -> Option<KeyGeneration> {
        self.records
            .range((*principal, KeyGeneration(0))..=(*principal, KeyGeneration(u64::MAX)))
            .next_back()
            .map(|((_, generation), _)| *generation)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SignerKeyProvider for KeyDirectory {
    fn lookup(&self, query: &SignerQuery) -> Option<SignerKeyRecord> {
        self.records
            .get(&(query.principal, query.generation))
            .copied()
    }
}
