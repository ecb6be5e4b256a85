//! # Verifier Errors
//!
//! One error enum per verification layer, unified in [`ChainError`].
//! Every error is `Clone + Eq` so a rejection can be retained and compared.

use thiserror::Error;

use super::value_objects::{ChainType, KeyGeneration, LinkId, LinkType, PrincipalId, Seqno};

/// Errors from the positional link codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before the record was complete.
    #[error("Truncated input")]
    TruncatedInput,

    /// The record's field count does not match its layout.
    #[error("Arity mismatch in {record}: expected {expected} fields, got {actual}")]
    ArityMismatch {
        /// Record being decoded.
        record: &'static str,
        /// Field count of the layout.
        expected: u32,
        /// Field count on the wire.
        actual: u32,
    },

    /// No layout exists for the declared version.
    #[error("Unknown {record} version {version}")]
    UnknownVersion {
        /// Record being decoded.
        record: &'static str,
        /// Declared version.
        version: u64,
    },

    /// A field holds the wrong wire type.
    #[error("Unexpected type for field {field}")]
    UnexpectedType {
        /// Field being decoded.
        field: &'static str,
    },

    /// A fixed-width field has the wrong length.
    #[error("Invalid length for field {field}: expected {expected}, got {actual}")]
    InvalidLength {
        /// Field being decoded.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Length on the wire.
        actual: usize,
    },

    /// A field is well typed but its value is out of range.
    #[error("Invalid value for field {field}: {detail}")]
    InvalidValue {
        /// Field being decoded.
        field: &'static str,
        /// What is wrong with it.
        detail: String,
    },

    /// Bytes remain after the record.
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    /// The bytes decode but are not the canonical encoding of what they decode to.
    #[error("Non-canonical encoding")]
    NonCanonical,

    /// The record exceeds the configured size limit.
    #[error("Record of {size} bytes exceeds limit of {limit}")]
    Oversized {
        /// Record size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Errors from hash-linkage checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkageError {
    /// Seqno is not exactly one past the previous link (or 1 for the first).
    #[error("Seqno mismatch: expected {expected}, got {actual}")]
    SeqnoMismatch {
        /// Required seqno.
        expected: Seqno,
        /// Claimed seqno.
        actual: Seqno,
    },

    /// The previous link already sits at the largest representable seqno.
    #[error("Seqno overflow after {0}")]
    SeqnoOverflow(Seqno),

    /// The first link carries a `prev`.
    #[error("First link must not carry prev")]
    UnexpectedPrev,

    /// A non-first link carries no `prev`.
    #[error("Missing prev")]
    MissingPrev,

    /// `prev` is not the previous link's id.
    #[error("Prev mismatch: expected {expected}, got {actual}")]
    PrevMismatch {
        /// LinkID of the previous accepted link.
        expected: LinkId,
        /// Claimed prev.
        actual: LinkId,
    },

    /// `curr` does not match the recomputed digest.
    #[error("Curr mismatch: claimed {claimed}, computed {computed}")]
    CurrMismatch {
        /// Declared curr.
        claimed: LinkId,
        /// Recomputed digest.
        computed: LinkId,
    },

    /// The inner link bytes do not hash to the outer link's `inner`.
    #[error("Inner link hash mismatch")]
    InnerHashMismatch,

    /// The chain type differs from the chain's established (or pinned) type.
    #[error("Chain type mismatch: expected {expected}, got {actual}")]
    ChainTypeMismatch {
        /// Established or configured chain type.
        expected: ChainType,
        /// Claimed chain type.
        actual: ChainType,
    },

    /// The chain belongs to a different principal than the batch names.
    #[error("Chain owner mismatch: expected {expected}, got {actual}")]
    OwnerMismatch {
        /// Principal the batch was submitted for.
        expected: PrincipalId,
        /// Owner established by the first link.
        actual: PrincipalId,
    },
}

/// Errors from body classification and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BodyError {
    /// No body layout for this tag. Skippable under `ignore_if_unsupported`.
    #[error("Unsupported link type {0}")]
    UnsupportedLinkType(LinkType),

    /// The link type may not appear on this chain type. Never skippable.
    #[error("Link type {link_type} is invalid on chain type {chain_type}")]
    InvalidChainTypeForLink {
        /// Claimed link type.
        link_type: LinkType,
        /// Claimed chain type.
        chain_type: ChainType,
    },

    /// An unsupported link opens the chain. Never skippable: the first
    /// link fixes chain type and owner, so it must be understood.
    #[error("First link has unsupported type {0}")]
    FirstLinkUnsupported(LinkType),

    /// The body bytes do not match the layout for the link type.
    #[error("Malformed body: {0}")]
    Malformed(CodecError),
}

impl BodyError {
    /// Whether `ignore_if_unsupported` may turn this error into a skip.
    pub fn is_skippable(&self) -> bool {
        matches!(self, BodyError::UnsupportedLinkType(_))
    }
}

/// Errors from signer resolution and signature verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    /// The key provider knows no key for the signer at this generation.
    #[error("Unknown signer {principal} at {generation}")]
    UnknownSigner {
        /// Claimed signer.
        principal: PrincipalId,
        /// Claimed generation.
        generation: KeyGeneration,
    },

    /// The provider returned a key of a different generation.
    #[error("Generation mismatch: claimed {claimed}, provider returned {actual}")]
    GenerationMismatch {
        /// Claimed generation.
        claimed: KeyGeneration,
        /// Generation of the returned key.
        actual: KeyGeneration,
    },

    /// The key was superseded at or before the link was made.
    #[error("Key {generation} superseded at {superseded_at}, link ctime {ctime}")]
    KeySuperseded {
        /// Claimed generation.
        generation: KeyGeneration,
        /// Supersession time.
        superseded_at: u64,
        /// Link creation time.
        ctime: u64,
    },

    /// The key was revoked at or before the link was made.
    #[error("Key {generation} revoked at {revoked_at}, link ctime {ctime}")]
    KeyRevoked {
        /// Claimed generation.
        generation: KeyGeneration,
        /// Revocation time.
        revoked_at: u64,
        /// Link creation time.
        ctime: u64,
    },

    /// The signer already used a later generation earlier in this chain.
    #[error("Signer {principal} regressed from {previous} to {claimed}")]
    GenerationRegressed {
        /// Signer.
        principal: PrincipalId,
        /// Highest generation already used in this chain.
        previous: KeyGeneration,
        /// Claimed generation.
        claimed: KeyGeneration,
    },

    /// The link claims to be older than the link before it.
    #[error("Link ctime regressed from {previous} to {ctime}")]
    CtimeRegressed {
        /// Ctime of the previous link.
        previous: u64,
        /// Claimed ctime.
        ctime: u64,
    },

    /// A user chain link signed by someone other than the chain's owner.
    #[error("{signer} cannot sign the chain of {owner}")]
    NotChainOwner {
        /// Owner of the chain.
        owner: PrincipalId,
        /// Claimed signer.
        signer: PrincipalId,
    },

    /// A team chain link signed by a non-member.
    #[error("{0} is not a team member")]
    NotTeamMember(PrincipalId),

    /// Out-of-band signer metadata disagrees with the signed inner link.
    #[error("Signer claim does not match inner link")]
    ClaimMismatch,

    /// The signature does not verify under the resolved key.
    #[error("Invalid signature")]
    InvalidSignature,
}

/// Errors from merkle anchor and parent-tail checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnchorError {
    /// Root hash is not 32 bytes.
    #[error("Invalid merkle root hash length {0}")]
    InvalidHashLength(usize),

    /// Root seqno is zero.
    #[error("Merkle root seqno must be non-zero")]
    ZeroSeqno,

    /// Root seqno went backwards.
    #[error("Merkle root seqno regressed from {previous} to {claimed}")]
    SeqnoRegressed {
        /// Seqno of the prior anchor.
        previous: u64,
        /// Claimed seqno.
        claimed: u64,
    },

    /// Root ctime went backwards.
    #[error("Merkle root ctime regressed from {previous} to {claimed}")]
    CtimeRegressed {
        /// Ctime of the prior anchor.
        previous: u64,
        /// Claimed ctime.
        claimed: u64,
    },

    /// Same root seqno, different hash.
    #[error("Conflicting merkle roots at seqno {0}")]
    Equivocation(u64),

    /// Root published after the link claims to have been made.
    #[error("Merkle root ctime {root_ctime} is after link ctime {link_ctime}")]
    FromFuture {
        /// Root ctime.
        root_ctime: u64,
        /// Link ctime.
        link_ctime: u64,
    },

    /// The root publication oracle does not know this root.
    #[error("Merkle root at seqno {0} is not published")]
    Unpublished(u64),

    /// Configuration requires an anchor and the link carries none.
    #[error("Merkle anchor required")]
    Missing,

    /// Parent-chain tail went backwards.
    #[error("Parent chain tail regressed from {previous} to {claimed}")]
    ParentTailRegressed {
        /// Seqno of the prior tail.
        previous: Seqno,
        /// Claimed seqno.
        claimed: Seqno,
    },

    /// Same parent seqno, different hash.
    #[error("Conflicting parent chain tails at seqno {0}")]
    ParentTailEquivocation(Seqno),

    /// Parent-chain tail changed chain type.
    #[error("Parent chain type changed from {previous} to {claimed}")]
    ParentTailChainType {
        /// Prior chain type.
        previous: ChainType,
        /// Claimed chain type.
        claimed: ChainType,
    },
}

/// Errors from applying a decoded body to chain state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// Key rotation skips or repeats a generation.
    #[error("Key generation gap: expected {expected}, got {actual}")]
    GenerationGap {
        /// Required generation.
        expected: KeyGeneration,
        /// Claimed generation.
        actual: KeyGeneration,
    },

    /// Removing a principal that is not a member.
    #[error("{0} is not a member")]
    NotAMember(PrincipalId),

    /// One link both adds and removes the same principal.
    #[error("{0} is both added and removed")]
    AddAndRemove(PrincipalId),

    /// Unfollowing a principal that is not followed.
    #[error("{0} is not followed")]
    NotFollowed(PrincipalId),

    /// A team chain opens with something other than a team root.
    #[error("Team chain must open with team_root, got {0}")]
    MissingTeamRoot(LinkType),

    /// A team root after the first link.
    #[error("Team root is only valid as the first link")]
    RootNotFirst,

    /// The body does not fit the chain's view.
    #[error("Body {link_type} cannot apply to a {chain_type} chain")]
    ViewMismatch {
        /// Body link type.
        link_type: LinkType,
        /// Chain type.
        chain_type: ChainType,
    },
}

/// Errors from opening an encrypted inner link.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecryptionError {
    /// The link is encrypted and no decryptor is configured.
    #[error("Encrypted inner link and no decryptor configured")]
    NoDecryptor,

    /// The decryptor holds no key for this kid.
    #[error("No key for kid {0}")]
    UnknownKey(String),

    /// Sealing format not supported.
    #[error("Unsupported encryption version {0}")]
    UnsupportedVersion(u32),

    /// Nonce has the wrong length.
    #[error("Invalid nonce length {0}")]
    InvalidNonce(usize),

    /// Authentication failed.
    #[error("Decryption failed")]
    Failed,
}

/// Coarse classification of a [`ChainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed bytes, arity or version mismatch, undecryptable payload.
    Decode,
    /// Seqno, prev, curr or chain-type discontinuity.
    Linkage,
    /// Unsupported link type or invalid link/chain type pairing.
    Type,
    /// Signer could not be resolved or signature is invalid.
    Signer,
    /// Merkle anchor or parent tail inconsistency.
    Anchor,
    /// Body cannot be folded into state.
    Fold,
}

impl ErrorCategory {
    /// Stable label, used for metric labels.
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Decode => "decode",
            ErrorCategory::Linkage => "linkage",
            ErrorCategory::Type => "type",
            ErrorCategory::Signer => "signer",
            ErrorCategory::Anchor => "anchor",
            ErrorCategory::Fold => "fold",
        }
    }
}

/// Any error that rejects a link.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Decoding failed.
    #[error("Decode error: {0}")]
    Codec(#[from] CodecError),

    /// Linkage check failed.
    #[error("Linkage error: {0}")]
    Linkage(#[from] LinkageError),

    /// Body classification or decoding failed.
    #[error("Body error: {0}")]
    Body(#[from] BodyError),

    /// Signer check failed.
    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    /// Anchor check failed.
    #[error("Anchor error: {0}")]
    Anchor(#[from] AnchorError),

    /// Fold rule failed.
    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),

    /// Encrypted inner link could not be opened.
    #[error("Decryption error: {0}")]
    Decryption(#[from] DecryptionError),
}

impl ChainError {
    /// Coarse classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChainError::Codec(_) | ChainError::Decryption(_) => ErrorCategory::Decode,
            ChainError::Body(BodyError::Malformed(_)) => ErrorCategory::Decode,
            ChainError::Linkage(_) => ErrorCategory::Linkage,
            ChainError::Body(_) => ErrorCategory::Type,
            ChainError::Signer(_) => ErrorCategory::Signer,
            ChainError::Anchor(_) => ErrorCategory::Anchor,
            ChainError::Apply(_) => ErrorCategory::Fold,
        }
    }
}

/// Errors from checkpoint snapshot (de)serialization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Serialization failed.
    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    /// Bytes are not a snapshot.
    #[error("Snapshot decoding failed: {0}")]
    Decode(String),
}

/// Errors from producing a new link.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProduceError {
    /// Encoding failed.
    #[error("Encoding failed: {0}")]
    Codec(#[from] CodecError),

    /// Sealing the inner link failed.
    #[error("Sealing failed: {0}")]
    Crypto(#[from] shared_crypto::CryptoError),

    /// The producer's chain is already at the largest representable seqno.
    #[error("Chain is full")]
    ChainFull,
}
