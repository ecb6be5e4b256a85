//! # Sigchain Verifier
//!
//! Verification and state folding for sigchains: append-only, hash-linked,
//! signed statement logs owned by users and teams.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Replay a principal's chain link by link and produce its current state
//! (follows, key generations, team membership) only if every link is
//! well-formed, correctly linked, correctly signed and monotonically
//! ordered. The first bad link halts the fold; nothing derived from it is
//! ever returned.
//!
//! ## Defenses
//!
//! | Attack | Defense |
//! |--------|---------|
//! | Reordered, dropped or duplicated links | Seqno continuity and `prev` linkage |
//! | Tampered fields | `curr` recomputed from the canonical preimage |
//! | Swapped inner link | Outer link attests the inner digest |
//! | Alternate encodings | Decoders accept only canonical bytes |
//! | Forged or stale signatures | Key validity at link time, no generation regression |
//! | Backdated links | Link ctime non-decreasing along the chain |
//! | Hijacked chains | User chains signed by their owner, team chains by members, batch owner enforced |
//! | Split-view merkle anchors | Anchors non-decreasing, no equivocation |
//! | Unknown link types | Fatal unless explicitly marked skippable, and never as the first link |
//!
//! ## Module Structure
//!
//! ```text
//! sigchain-verifier/
//! ├── domain/          # Identifiers, links, bodies, chain state, errors
//! ├── codec/           # Positional MessagePack link codec
//! ├── algorithms/      # Link identity, body/signer resolution, anchors, fold rules
//! ├── ports/           # API trait (inbound) + key/root/decryptor traits (outbound)
//! ├── adapters/        # In-memory key directory, published roots, keyring, JSON batches
//! ├── application/     # ChainVerifier service and LinkProducer
//! └── config.rs        # VerifierConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod codec;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{BatchError, KeyDirectory, Keyring, LinkBatch, PublishedRoots};
pub use algorithms::{
    apply_body, check_anchor, check_parent_tail, classify_link, compute_curr, compute_link_id,
    decode_body, encode_body, resolve_signer, verify_inner_attestation, verify_linkage,
};
pub use application::{seal_link, ChainVerifier, LinkDraft, LinkProducer, SealedLink};
pub use codec::{
    decode_inner_link, decode_outer_link, encode_inner_link, encode_outer_link,
    outer_canonical_preimage,
};
pub use config::VerifierConfig;
pub use domain::{
    AnchorError, ApplyError, BodyError, BodyVariant, ChainBatch, ChainError, ChainState,
    ChainType, ChainView, CodecError, DecryptionError, ErrorCategory, FoldState, FollowMap,
    InnerLink, KeyGeneration, KeyRotation, Kid, LinkId, LinkType, LinkageError,
    MembershipChange, MerkleRoot, OuterLink, PrincipalId, ProduceError, RawLink, Rejection,
    Seqno, SignerClaim, SignerError, SkippedLink, Tail, TeamChainView, TeamRole, TeamRoot,
    UserChainView,
};
pub use ports::{
    InnerLinkDecryptor, MockRootOracle, MockSignerKeys, RootPublicationOracle,
    SigchainVerifierApi, SignerKeyProvider, SignerKeyRecord, SignerQuery,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
