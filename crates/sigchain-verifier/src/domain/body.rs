//! # Link Bodies
//!
//! Tagged union over every body shape this verifier understands, plus an
//! explicit case for link types it does not.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::value_objects::{KeyGeneration, Kid, LinkType, PrincipalId, Seqno, TeamRole};

/// Followed principal to the seqno of its chain at follow time.
pub type FollowMap = BTreeMap<PrincipalId, Seqno>;

/// A per-user or per-team key rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRotation {
    /// New generation; must directly follow the previous one.
    pub generation: KeyGeneration,
    /// Encryption key of the new generation.
    pub encryption_kid: Kid,
    /// Signing key of the new generation.
    pub signing_kid: Kid,
}

/// Team membership delta.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipChange {
    /// Members to add, or whose role changes.
    pub add: BTreeMap<PrincipalId, TeamRole>,
    /// Members to remove.
    pub remove: BTreeSet<PrincipalId>,
}

/// Opening link of a team chain: the team's id and its founding members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoot {
    /// Team principal; becomes the owner of the chain.
    pub team: PrincipalId,
    /// Founding members. Never empty, and includes the signer.
    pub members: BTreeMap<PrincipalId, TeamRole>,
}

/// Decoded body of an inner link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyVariant {
    /// Follow pins to merge into the follow set.
    PassiveFollow(FollowMap),
    /// Replacement for the secret summary.
    SecretSummary(FollowMap),
    /// Per-user-key rotation.
    PerUserKey(KeyRotation),
    /// Principals to drop from the follow set; each must be followed.
    Unfollow(BTreeSet<PrincipalId>),
    /// Team chain opening.
    TeamRoot(TeamRoot),
    /// Per-team-key rotation.
    TeamPtk(KeyRotation),
    /// Membership delta.
    TeamChangeMembership(MembershipChange),
    /// The signer leaves the team. No payload.
    TeamLeave,
    /// A link type this verifier does not understand, skipped under
    /// `ignore_if_unsupported`. `raw` is the inner link exactly as
    /// transmitted; it is never decoded or decrypted.
    Unrecognized {
        /// Tag the link claimed.
        link_type: LinkType,
        /// Undecoded inner-link bytes.
        raw: Vec<u8>,
    },
}

impl BodyVariant {
    /// Link type this body belongs to.
    pub fn link_type(&self) -> LinkType {
        match self {
            BodyVariant::PassiveFollow(_) => LinkType::PassiveFollow,
            BodyVariant::SecretSummary(_) => LinkType::SecretSummary,
            BodyVariant::PerUserKey(_) => LinkType::PerUserKey,
            BodyVariant::Unfollow(_) => LinkType::Unfollow,
            BodyVariant::TeamRoot(_) => LinkType::TeamRoot,
            BodyVariant::TeamPtk(_) => LinkType::TeamPtk,
            BodyVariant::TeamChangeMembership(_) => LinkType::TeamChangeMembership,
            BodyVariant::TeamLeave => LinkType::TeamLeave,
            BodyVariant::Unrecognized { link_type, .. } => *link_type,
        }
    }
}
