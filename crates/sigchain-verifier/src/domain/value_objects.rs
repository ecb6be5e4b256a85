//! # Domain Value Objects
//!
//! Small immutable identifiers and tags shared by every layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a link within its chain (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seqno(pub u64);

impl Seqno {
    /// Seqno of the first link of every chain.
    pub const FIRST: Seqno = Seqno(1);

    /// The successor position, if it exists.
    pub fn next(self) -> Option<Seqno> {
        self.0.checked_add(1).map(Seqno)
    }

    /// Raw value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Seqno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA-256 content hash of a canonical outer-link encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub [u8; 32]);

impl LinkId {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkId({})", self)
    }
}

/// Identifier of a user or team.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub [u8; 16]);

impl PrincipalId {
    /// Raw id bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrincipalId({})", self)
    }
}

/// Ordinal of a signer's key lineage (`signingKeySeqno` on the wire).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyGeneration(pub u64);

impl KeyGeneration {
    /// Generation of a freshly provisioned key lineage.
    pub const FIRST: KeyGeneration = KeyGeneration(1);

    /// The successor generation, if it exists.
    pub fn next(self) -> Option<KeyGeneration> {
        self.0.checked_add(1).map(KeyGeneration)
    }
}

impl fmt::Display for KeyGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Key identifier carried inside key-rotation bodies.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Kid(pub [u8; 32]);

impl fmt::Display for Kid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Kid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kid({})", self)
    }
}

/// Link type tag of an outer link.
///
/// Unknown tags are preserved so a link marked `ignore_if_unsupported`
/// can be skipped without losing what it claimed to be. `Unknown` only
/// ever carries a tag with no named variant: `Unknown(1)` is not a way to
/// spell `PassiveFollow`, and [`LinkType::is_canonical`] is false for it.
/// Encoders refuse non-canonical tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// Pin another principal's chain position without a full follow.
    PassiveFollow,
    /// Wholesale summary of followed principals.
    SecretSummary,
    /// Per-user-key rotation on a user's private chain.
    PerUserKey,
    /// Drop principals from the follow set.
    Unfollow,
    /// Opening link of a team chain.
    TeamRoot,
    /// Add or remove team members.
    TeamChangeMembership,
    /// Per-team-key rotation.
    TeamPtk,
    /// The signer leaves the team.
    TeamLeave,
    /// Any tag this verifier does not understand.
    Unknown(u64),
}

impl LinkType {
    /// Map a wire tag to a link type.
    pub fn from_u64(value: u64) -> Self {
        match value {
            1 => LinkType::PassiveFollow,
            2 => LinkType::SecretSummary,
            3 => LinkType::PerUserKey,
            4 => LinkType::Unfollow,
            32 => LinkType::TeamRoot,
            33 => LinkType::TeamChangeMembership,
            34 => LinkType::TeamPtk,
            35 => LinkType::TeamLeave,
            other => LinkType::Unknown(other),
        }
    }

    /// Wire tag.
    pub fn as_u64(self) -> u64 {
        match self {
            LinkType::PassiveFollow => 1,
            LinkType::SecretSummary => 2,
            LinkType::PerUserKey => 3,
            LinkType::Unfollow => 4,
            LinkType::TeamRoot => 32,
            LinkType::TeamChangeMembership => 33,
            LinkType::TeamPtk => 34,
            LinkType::TeamLeave => 35,
            LinkType::Unknown(other) => other,
        }
    }

    /// Stable label, used for log fields and metric labels.
    pub fn label(self) -> &'static str {
        match self {
            LinkType::PassiveFollow => "passive_follow",
            LinkType::SecretSummary => "secret_summary",
            LinkType::PerUserKey => "per_user_key",
            LinkType::Unfollow => "unfollow",
            LinkType::TeamRoot => "team_root",
            LinkType::TeamChangeMembership => "team_change_membership",
            LinkType::TeamPtk => "team_ptk",
            LinkType::TeamLeave => "team_leave",
            LinkType::Unknown(_) => "unknown",
        }
    }

    /// Whether this verifier has a body layout for the tag.
    pub fn is_known(self) -> bool {
        !matches!(self, LinkType::Unknown(_))
    }

    /// False for an `Unknown` wrapping an assigned tag.
    pub fn is_canonical(self) -> bool {
        LinkType::from_u64(self.as_u64()) == self
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Unknown(tag) => write!(f, "unknown({})", tag),
            known => f.write_str(known.label()),
        }
    }
}

/// Which logical chain a link belongs to.
///
/// As with [`LinkType`], `Unknown` only carries unassigned tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChainType {
    /// A user's private chain.
    UserPrivate,
    /// A team's private chain.
    TeamPrivate,
    /// Any tag this verifier does not understand.
    Unknown(u64),
}

impl ChainType {
    /// Map a wire tag to a chain type.
    pub fn from_u64(value: u64) -> Self {
        match value {
            16 => ChainType::UserPrivate,
            17 => ChainType::TeamPrivate,
            other => ChainType::Unknown(other),
        }
    }

    /// Wire tag.
    pub fn as_u64(self) -> u64 {
        match self {
            ChainType::UserPrivate => 16,
            ChainType::TeamPrivate => 17,
            ChainType::Unknown(other) => other,
        }
    }

    /// False for an `Unknown` wrapping an assigned tag.
    pub fn is_canonical(self) -> bool {
        ChainType::from_u64(self.as_u64()) == self
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainType::UserPrivate => f.write_str("user_private"),
            ChainType::TeamPrivate => f.write_str("team_private"),
            ChainType::Unknown(tag) => write!(f, "unknown({})", tag),
        }
    }
}

/// Team role recorded by membership changes. Data only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamRole {
    /// Read access.
    Reader,
    /// Write access.
    Writer,
    /// Administrative access.
    Admin,
    /// Ownership.
    Owner,
    /// Automated member.
    Bot,
    /// Automated member with restricted scope.
    RestrictedBot,
}

impl TeamRole {
    /// Map a wire tag to a role. `0` and values above `6` have no role.
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(TeamRole::Reader),
            2 => Some(TeamRole::Writer),
            3 => Some(TeamRole::Admin),
            4 => Some(TeamRole::Owner),
            5 => Some(TeamRole::Bot),
            6 => Some(TeamRole::RestrictedBot),
            _ => None,
        }
    }

    /// Wire tag.
    pub fn as_u64(self) -> u64 {
        match self {
            TeamRole::Reader => 1,
            TeamRole::Writer => 2,
            TeamRole::Admin => 3,
            TeamRole::Owner => 4,
            TeamRole::Bot => 5,
            TeamRole::RestrictedBot => 6,
        }
    }
}
