//! # Domain Entities
//!
//! Decoded link records and the raw records they are decoded from.

use serde::{Deserialize, Serialize};

use super::value_objects::{ChainType, KeyGeneration, LinkId, LinkType, PrincipalId, Seqno};

/// Snapshot of a globally published merkle root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleRoot {
    /// Root hash. Structurally 32 bytes; length is checked by the anchor checker.
    pub hash: Vec<u8>,
    /// Position of the root in the global publication order.
    pub seqno: u64,
    /// Publication time (seconds since epoch).
    pub ctime: u64,
}

/// Free-text description of the software that produced a link. Non-authoritative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub desc: String,
    /// Client version.
    pub version: String,
}

/// Present on an outer link only when its inner link is encrypted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionParameters {
    /// Sealing format version.
    pub version: u32,
    /// Identifier of the symmetric key the inner link is sealed with.
    pub kid: Vec<u8>,
    /// Nonce used for sealing.
    pub nonce: Vec<u8>,
}

/// Compact pointer to the tip of another chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tail {
    /// Chain type of the referenced chain.
    pub chain_type: ChainType,
    /// Seqno of the referenced tip.
    pub seqno: Seqno,
    /// LinkID of the referenced tip.
    pub hash: LinkId,
}

/// The signed envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OuterLink {
    /// Format generation; selects the field layout.
    pub version: u64,
    /// 1-based position in the chain.
    pub seqno: Seqno,
    /// LinkID of the preceding outer link; absent only for seqno 1.
    pub prev: Option<LinkId>,
    /// Declared LinkID of this outer link. Recomputed, never trusted.
    pub curr: LinkId,
    /// SHA-256 of the inner-link bytes as transmitted.
    pub inner: LinkId,
    /// Link type tag.
    pub link_type: LinkType,
    /// Chain type tag.
    pub chain_type: ChainType,
    /// Skip instead of failing when the link type is not understood.
    pub ignore_if_unsupported: bool,
    /// Set when the inner link is encrypted.
    pub encryption_parameters: Option<EncryptionParameters>,
}

/// The payload attested by an outer link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerLink {
    /// Format generation; selects the field layout.
    pub version: u64,
    /// Principal whose key signed the outer link.
    pub signer: PrincipalId,
    /// Generation of the signer's key that signed the outer link.
    pub signing_key_seqno: KeyGeneration,
    /// Creation time (seconds since epoch).
    pub ctime: u64,
    /// Random bytes that keep low-entropy bodies from being guessed via `inner`.
    pub entropy: Vec<u8>,
    /// Recency anchor.
    pub merkle_root: Option<MerkleRoot>,
    /// Producer description.
    pub client: Option<ClientInfo>,
    /// Tip of the parent chain this chain hangs off, if any.
    pub parent_chain: Option<Tail>,
    /// Encoded body; its layout is selected by the outer link's type.
    pub body: Vec<u8>,
}

/// Signer identity claimed out of band for a raw link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerClaim {
    /// Claimed signing principal.
    pub principal: PrincipalId,
    /// Claimed key generation.
    pub key_generation: KeyGeneration,
}

/// One link as delivered by a collaborator: bytes plus signer metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLink {
    /// Encoded outer link; the exact bytes that were signed.
    pub outer: Vec<u8>,
    /// Encoded inner link, or its ciphertext when encrypted.
    pub inner: Vec<u8>,
    /// Ed25519 signature over `outer`.
    pub sig: Vec<u8>,
    /// Claimed signer.
    pub signer: SignerClaim,
}

/// An ordered run of links for one chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainBatch {
    /// Principal the chain must belong to, when the collaborator knows it.
    /// Enforced by `fold_batch`.
    pub principal: Option<PrincipalId>,
    /// Links in chain order.
    pub links: Vec<RawLink>,
}

impl ChainBatch {
    /// Batch for an identified chain.
    pub fn new(principal: PrincipalId, links: Vec<RawLink>) -> Self {
        Self {
            principal: Some(principal),
            links,
        }
    }
}
