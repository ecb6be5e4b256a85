//! # Domain Invariants
//!
//! Constants of the wire format and small predicates shared by the
//! algorithms.

use super::value_objects::{ChainType, KeyGeneration, LinkType};

/// Length of a LinkID and of a merkle root hash.
pub const LINK_ID_LEN: usize = 32;

/// Length of a principal id.
pub const PRINCIPAL_ID_LEN: usize = 16;

/// Outer-link version produced by this crate.
pub const CURRENT_OUTER_VERSION: u64 = 3;

/// Inner-link version produced by this crate.
pub const CURRENT_INNER_VERSION: u64 = 3;

/// Sealing format for encrypted inner links: XChaCha20-Poly1305.
pub const ENCRYPTION_VERSION_XCHACHA: u32 = 1;

/// Entropy length used by the link producer.
pub const DEFAULT_ENTROPY_LEN: usize = 16;

/// Default size limit for a single encoded outer or inner link (1 MiB).
pub const DEFAULT_MAX_LINK_BYTES: usize = 1024 * 1024;

/// Default tolerance for an anchor newer than the link embedding it.
pub const DEFAULT_MAX_ANCHOR_SKEW_SECS: u64 = 3600;

/// Chain types a known link type may legally appear on.
pub fn legal_chain_types(link_type: LinkType) -> &'static [ChainType] {
    match link_type {
        LinkType::PassiveFollow
        | LinkType::SecretSummary
        | LinkType::PerUserKey
        | LinkType::Unfollow => &[ChainType::UserPrivate],
        LinkType::TeamRoot
        | LinkType::TeamChangeMembership
        | LinkType::TeamPtk
        | LinkType::TeamLeave => &[ChainType::TeamPrivate],
        LinkType::Unknown(_) => &[],
    }
}

/// Invariant: keys of a positional map appear strictly increasing
/// (sorted, no duplicates).
pub fn invariant_strictly_increasing<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0] < pair[1])
}

/// Invariant: a key rotation names exactly the generation after the
/// current one, starting at 1.
pub fn invariant_generation_successor(
    current: Option<KeyGeneration>,
    next: KeyGeneration,
) -> bool {
    match current {
        None => next == KeyGeneration::FIRST,
        Some(current) => current.next() == Some(next),
    }
}
