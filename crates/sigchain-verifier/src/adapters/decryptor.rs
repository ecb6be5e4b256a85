//! Keyring decryptor for encrypted inner links.
//!
//! Inner links sealed with [`ENCRYPTION_VERSION_XCHACHA`] carry a 24-byte
//! nonce and the kid of the symmetric key in their encryption parameters.

use std::collections::BTreeMap;

use shared_crypto::{decrypt, Nonce, SecretKey, NONCE_LEN};

use crate::domain::{DecryptionError, EncryptionParameters, ENCRYPTION_VERSION_XCHACHA};
use crate::ports::InnerLinkDecryptor;

/// Symmetric keys by kid.
#[derive(Clone, Default)]
pub struct Keyring {
    keys: BTreeMap<Vec<u8>, SecretKey>,
}

impl Keyring {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key under `kid`.
    pub fn insert(&mut self, kid: impl Into<Vec<u8>>, key: SecretKey) -> &mut Self {
        self.keys.insert(kid.into(), key);
        self
    }

    /// Whether a key is held for `kid`.
    pub fn contains(&self, kid: &[u8]) -> bool {
        self.keys.contains_key(kid)
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the keyring is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyring")
            .field("kids", &self.keys.keys().map(hex::encode).collect::<Vec<_>>())
            .finish()
    }
}

impl InnerLinkDecryptor for Keyring {
    fn decrypt(
        &self,
        params: &EncryptionParameters,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, DecryptionError> {
        if params.version != ENCRYPTION_VERSION_XCHACHA {
            return Err(DecryptionError::UnsupportedVersion(params.version));
        }
        if params.nonce.len() != NONCE_LEN {
            return Err(DecryptionError::InvalidNonce(params.nonce.len()));
        }
        let nonce = Nonce::from_slice(&params.nonce)
            .map_err(|_| DecryptionError::InvalidNonce(params.nonce.len()))?;
        let key = self
            .keys
            .get(&params.kid)
            .ok_or_else(|| DecryptionError::UnknownKey(hex::encode(&params.kid)))?;
        decrypt(key, ciphertext, &nonce).map_err(|_| DecryptionError::Failed)
    }
}
