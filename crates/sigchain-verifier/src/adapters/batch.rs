//! JSON batch input.
//!
//! ```json
//! {
//!   "principal": "00112233445566778899aabbccddeeff",
//!   "links": [
//!     {
//!       "outer": "99...", "inner": "99...", "sig": "...",
//!       "signer": { "principal": "0011...", "key_generation": 1 }
//!     }
//!   ]
//! }
//! ```
//!
//! All byte fields are lowercase or uppercase hex. `principal` may be
//! omitted or null.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use thiserror::Error;

use crate::domain::{
    ChainBatch, KeyGeneration, PrincipalId, RawLink, SignerClaim, PRINCIPAL_ID_LEN,
};

/// Errors reading a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    /// Not valid JSON, or a field is missing or not hex.
    #[error("Invalid batch JSON: {0}")]
    Json(String),

    /// A principal id has the wrong length.
    #[error("Invalid {field} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Offending field.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Decoded length.
        actual: usize,
    },
}

/// Signer metadata as carried in a batch.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRecord {
    /// Claimed signing principal.
    #[serde_as(as = "Hex")]
    pub principal: Vec<u8>,
    /// Claimed key generation.
    pub key_generation: u64,
}

/// One link as carried in a batch.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Encoded outer link.
    #[serde_as(as = "Hex")]
    pub outer: Vec<u8>,
    /// Encoded inner link or its ciphertext.
    #[serde_as(as = "Hex")]
    pub inner: Vec<u8>,
    /// Signature over `outer`.
    #[serde_as(as = "Hex")]
    pub sig: Vec<u8>,
    /// Claimed signer.
    pub signer: SignerRecord,
}

/// A chain's links as carried in a batch.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkBatch {
    /// Chain owner, if known.
    #[serde_as(as = "Option<Hex>")]
    #[serde(default)]
    pub principal: Option<Vec<u8>>,
    /// Links in chain order.
    pub links: Vec<LinkRecord>,
}

impl LinkBatch {
    /// Parse a batch from JSON.
    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        serde_json::from_str(json).map_err(|e| BatchError::Json(e.to_string()))
    }

    /// Render the batch as JSON.
    pub fn to_json(&self) -> Result<String, BatchError> {
        serde_json::to_string_pretty(self).map_err(|e| BatchError::Json(e.to_string()))
    }

    /// Raw links in batch order.
    pub fn raw_links(&self) -> Result<Vec<RawLink>, BatchError> {
        self.links.iter().map(LinkRecord::to_raw).collect()
    }

    /// Convert into a chain batch for the verifier.
    pub fn into_chain_batch(self) -> Result<ChainBatch, BatchError> {
        let principal = self
            .principal
            .as_deref()
            .map(|bytes| principal_id("principal", bytes))
            .transpose()?;
        Ok(ChainBatch {
            principal,
            links: self.raw_links()?,
        })
    }
}

impl From<&ChainBatch> for LinkBatch {
    fn from(batch: &ChainBatch) -> Self {
        Self {
            principal: batch.principal.map(|p| p.as_bytes().to_vec()),
            links: batch.links.iter().map(LinkRecord::from).collect(),
        }
    }
}

impl LinkRecord {
    fn to_raw(&self) -> Result<RawLink, BatchError> {
        Ok(RawLink {
            outer: self.outer.clone(),
            inner: self.inner.clone(),
            sig: self.sig.clone(),
            signer: SignerClaim {
                principal: principal_id("signer.principal", &self.signer.principal)?,
                key_generation: KeyGeneration(self.signer.key_generation),
            },
        })
    }
}

impl From<&RawLink> for LinkRecord {
    fn from(link: &RawLink) -> Self {
        Self {
            outer: link.outer.clone(),
            inner: link.inner.clone(),
            sig: link.sig.clone(),
            signer: SignerRecord {
                principal: link.signer.principal.as_bytes().to_vec(),
                key_generation: link.signer.key_generation.0,
            },
        }
    }
}

fn principal_id(field: &'static str, bytes: &[u8]) -> Result<PrincipalId, BatchError> {
    let array: [u8; PRINCIPAL_ID_LEN] =
        bytes.try_into().map_err(|_| BatchError::InvalidLength {
            field,
            expected: PRINCIPAL_ID_LEN,
            actual: bytes.len(),
        })?;
    Ok(PrincipalId(array))
}
