//! # Link Producer
//!
//! Builds, hashes and signs the next link of a chain. The verifier never
//! calls this; it is the writer side used by tooling and by tests that need
//! well-formed chains.

use rand::RngCore;
use shared_crypto::{encrypt, Ed25519KeyPair, SecretKey};

use crate::algorithms::{compute_curr, compute_link_id, encode_body};
use crate::codec::{encode_inner_link, encode_outer_link};
use crate::domain::{
    BodyVariant, ChainType, ClientInfo, CodecError, EncryptionParameters, InnerLink,
    KeyGeneration, LinkId, MerkleRoot, OuterLink, PrincipalId, ProduceError, RawLink, Seqno,
    SignerClaim, Tail, CURRENT_INNER_VERSION, CURRENT_OUTER_VERSION, DEFAULT_ENTROPY_LEN,
    ENCRYPTION_VERSION_XCHACHA,
};

/// Encode and sign an outer link, pairing it with already-encoded inner
/// bytes. The outer link is signed exactly as given; `curr` and `inner`
/// are not recomputed.
pub fn seal_link(
    outer: &OuterLink,
    inner: Vec<u8>,
    keypair: &Ed25519KeyPair,
    signer: SignerClaim,
) -> Result<RawLink, CodecError> {
    let outer_bytes = encode_outer_link(outer)?;
    let sig = keypair.sign(&outer_bytes).as_bytes().to_vec();
    Ok(RawLink {
        outer: outer_bytes,
        inner,
        sig,
        signer,
    })
}

/// Contents of a link to be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkDraft {
    /// Body; its variant selects the link type.
    pub body: BodyVariant,
    /// Creation time (seconds since epoch).
    pub ctime: u64,
    /// Anchor into the public merkle tree.
    pub merkle_root: Option<MerkleRoot>,
    /// Pointer into a parent chain.
    pub parent_chain: Option<Tail>,
    /// Let verifiers that do not understand the link type skip it.
    pub ignore_if_unsupported: bool,
}

impl LinkDraft {
    /// Draft with no anchor, no parent pointer and strict type handling.
    pub fn new(body: BodyVariant, ctime: u64) -> Self {
        Self {
            body,
            ctime,
            merkle_root: None,
            parent_chain: None,
            ignore_if_unsupported: false,
        }
    }

    /// Anchor the link.
    pub fn with_merkle_root(mut self, root: MerkleRoot) -> Self {
        self.merkle_root = Some(root);
        self
    }

    /// Point the link into a parent chain.
    pub fn with_parent_chain(mut self, tail: Tail) -> Self {
        self.parent_chain = Some(tail);
        self
    }

    /// Mark the link skippable for verifiers that do not know its type.
    pub fn skippable(mut self) -> Self {
        self.ignore_if_unsupported = true;
        self
    }
}

/// A produced link: the raw form for verifiers and the decoded outer link
/// the next link must chain to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedLink {
    /// Decoded outer link.
    pub outer: OuterLink,
    /// Bytes, signature and signer claim.
    pub raw: RawLink,
}

/// Produces links for one signer on one chain type.
pub struct LinkProducer {
    chain_type: ChainType,
    signer: PrincipalId,
    generation: KeyGeneration,
    keypair: Ed25519KeyPair,
    client: Option<ClientInfo>,
    encryption: Option<(Vec<u8>, SecretKey)>,
}

impl LinkProducer {
    /// Create a producer signing as `signer` with key `generation`.
    pub fn new(
        chain_type: ChainType,
        signer: PrincipalId,
        generation: KeyGeneration,
        keypair: Ed25519KeyPair,
    ) -> Self {
        Self {
            chain_type,
            signer,
            generation,
            keypair,
            client: None,
            encryption: None,
        }
    }

    /// Stamp produced links with client information.
    pub fn with_client(mut self, desc: impl Into<String>, version: impl Into<String>) -> Self {
        self.client = Some(ClientInfo {
            desc: desc.into(),
            version: version.into(),
        });
        self
    }

    /// Seal inner links under `key`, advertised as `kid`.
    pub fn with_encryption(mut self, kid: impl Into<Vec<u8>>, key: SecretKey) -> Self {
        self.encryption = Some((kid.into(), key));
        self
    }

    /// Claim attached to produced links.
    pub fn claim(&self) -> SignerClaim {
        SignerClaim {
            principal: self.signer,
            key_generation: self.generation,
        }
    }

    /// Signing keypair.
    pub fn keypair(&self) -> &Ed25519KeyPair {
        &self.keypair
    }

    /// Produce the link following `tip` (`None` for the first link).
    ///
    /// # Errors
    ///
    /// - `ChainFull`: `tip` is at the largest seqno
    /// - `Codec`: a field cannot be encoded
    /// - `Crypto`: sealing the inner link failed
    pub fn produce(
        &self,
        tip: Option<&OuterLink>,
        draft: LinkDraft,
    ) -> Result<SealedLink, ProduceError> {
        let seqno = match tip {
            None => Seqno::FIRST,
            Some(tip) => tip.seqno.next().ok_or(ProduceError::ChainFull)?,
        };

        let mut entropy = vec![0u8; DEFAULT_ENTROPY_LEN];
        rand::thread_rng().fill_bytes(&mut entropy);

        let inner = InnerLink {
            version: CURRENT_INNER_VERSION,
            signer: self.signer,
            signing_key_seqno: self.generation,
            ctime: draft.ctime,
            entropy,
            merkle_root: draft.merkle_root,
            client: self.client.clone(),
            parent_chain: draft.parent_chain,
            body: encode_body(&draft.body)?,
        };
        let plaintext = encode_inner_link(&inner)?;

        let (transmitted, encryption_parameters) = match &self.encryption {
            None => (plaintext, None),
            Some((kid, key)) => {
                let (ciphertext, nonce) = encrypt(key, &plaintext)?;
                let params = EncryptionParameters {
                    version: ENCRYPTION_VERSION_XCHACHA,
                    kid: kid.clone(),
                    nonce: nonce.as_bytes().to_vec(),
                };
                (ciphertext, Some(params))
            }
        };

        let mut outer = OuterLink {
            version: CURRENT_OUTER_VERSION,
            seqno,
            prev: tip.map(|tip| tip.curr),
            curr: LinkId([0u8; 32]),
            inner: compute_link_id(&transmitted),
            link_type: draft.body.link_type(),
            chain_type: self.chain_type,
            ignore_if_unsupported: draft.ignore_if_unsupported,
            encryption_parameters,
        };
        outer.curr = compute_curr(&outer)?;

        let raw = seal_link(&outer, transmitted, &self.keypair, self.claim())?;
        Ok(SealedLink { outer, raw })
    }
}
