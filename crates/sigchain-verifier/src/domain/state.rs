//! # Chain State
//!
//! Immutable snapshots produced by folding links, and the fold state
//! machine wrapped around them.
//!
//! A `ChainState` is never mutated once returned: folding a link clones
//! the prior snapshot and returns a new one, so callers may keep and
//! compare historical snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::body::{FollowMap, KeyRotation};
use super::entities::{MerkleRoot, OuterLink, Tail};
use super::errors::{ChainError, SnapshotError};
use super::value_objects::{
    ChainType, KeyGeneration, LinkId, LinkType, PrincipalId, Seqno, TeamRole,
};

/// Semantic state of a user's private chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChainView {
    /// Accumulated passive follows.
    pub follows: FollowMap,
    /// Latest secret summary.
    pub secret_summaries: FollowMap,
    /// Current per-user key.
    pub per_user_key: Option<KeyRotation>,
}

/// Semantic state of a team's private chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamChainView {
    /// Current members and their roles.
    pub members: BTreeMap<PrincipalId, TeamRole>,
    /// Every per-team key by generation.
    pub per_team_keys: BTreeMap<KeyGeneration, KeyRotation>,
}

impl TeamChainView {
    /// Latest per-team key generation.
    pub fn current_generation(&self) -> Option<KeyGeneration> {
        self.per_team_keys.keys().next_back().copied()
    }
}

/// Chain-type specific view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainView {
    /// User private chain.
    User(UserChainView),
    /// Team private chain.
    Team(TeamChainView),
}

impl ChainView {
    /// Empty view for a chain type; `None` for a chain type with no view.
    pub fn empty_for(chain_type: ChainType) -> Option<Self> {
        match chain_type {
            ChainType::UserPrivate => Some(ChainView::User(UserChainView::default())),
            ChainType::TeamPrivate => Some(ChainView::Team(TeamChainView::default())),
            ChainType::Unknown(_) => None,
        }
    }
}

/// Record of a link skipped under `ignore_if_unsupported`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLink {
    /// Position of the skipped link.
    pub seqno: Seqno,
    /// Tag it claimed.
    pub link_type: LinkType,
}

/// Accumulated state after folding a valid chain prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
    pub(crate) chain_type: ChainType,
    pub(crate) owner: PrincipalId,
    pub(crate) last_link: OuterLink,
    pub(crate) last_ctime: Option<u64>,
    pub(crate) last_anchor: Option<MerkleRoot>,
    pub(crate) parent_tail: Option<Tail>,
    pub(crate) signer_generations: BTreeMap<PrincipalId, KeyGeneration>,
    pub(crate) skipped: Vec<SkippedLink>,
    pub(crate) view: ChainView,
}

impl ChainState {
    /// Chain type fixed by the first link.
    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    /// Principal the chain belongs to, fixed by the first link: the signer
    /// on a user chain, the team named by the root on a team chain.
    pub fn owner(&self) -> PrincipalId {
        self.owner
    }

    /// Seqno of the last accepted link.
    pub fn seqno(&self) -> Seqno {
        self.last_link.seqno
    }

    /// LinkID of the last accepted link; the next link's `prev`.
    pub fn tip(&self) -> LinkId {
        self.last_link.curr
    }

    /// The last accepted outer link.
    pub fn last_link(&self) -> &OuterLink {
        &self.last_link
    }

    /// Ctime of the last link whose inner link was read.
    pub fn last_ctime(&self) -> Option<u64> {
        self.last_ctime
    }

    /// Latest accepted merkle anchor.
    pub fn last_anchor(&self) -> Option<&MerkleRoot> {
        self.last_anchor.as_ref()
    }

    /// Latest accepted parent-chain tail.
    pub fn parent_tail(&self) -> Option<&Tail> {
        self.parent_tail.as_ref()
    }

    /// Highest key generation a signer has used in this chain.
    pub fn signer_generation(&self, principal: &PrincipalId) -> Option<KeyGeneration> {
        self.signer_generations.get(principal).copied()
    }

    /// Highest key generation per signer.
    pub fn signer_generations(&self) -> &BTreeMap<PrincipalId, KeyGeneration> {
        &self.signer_generations
    }

    /// Links skipped under `ignore_if_unsupported`, in chain order.
    pub fn skipped(&self) -> &[SkippedLink] {
        &self.skipped
    }

    /// Chain-type specific view.
    pub fn view(&self) -> &ChainView {
        &self.view
    }

    /// User view, when this is a user chain.
    pub fn user_view(&self) -> Option<&UserChainView> {
        match &self.view {
            ChainView::User(view) => Some(view),
            _ => None,
        }
    }

    /// Team view, when this is a team chain.
    pub fn team_view(&self) -> Option<&TeamChainView> {
        match &self.view {
            ChainView::Team(view) => Some(view),
            _ => None,
        }
    }

    /// Serialize as a checkpoint.
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Restore a checkpoint written by [`ChainState::to_snapshot_bytes`].
    ///
    /// The bytes are trusted: a checkpoint must come from the caller's own
    /// storage of a previously returned `Valid` state.
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

/// Why and where a fold stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Seqno the rejected link should have occupied.
    pub at_seqno: Seqno,
    /// First fatal error.
    pub error: ChainError,
    /// State after the last accepted link, if any.
    pub last_valid: Option<ChainState>,
}

/// Fold state machine: `Empty -> Valid -> ... -> Rejected` (terminal).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FoldState {
    /// No links processed.
    Empty,
    /// All links so far accepted.
    Valid(ChainState),
    /// A link was rejected; nothing further is applied.
    Rejected(Rejection),
}

impl FoldState {
    /// Seqno of the last accepted link.
    pub fn seqno(&self) -> Option<Seqno> {
        match self {
            FoldState::Empty => None,
            FoldState::Valid(state) => Some(state.seqno()),
            FoldState::Rejected(rejection) => rejection.last_valid.as_ref().map(ChainState::seqno),
        }
    }

    /// The valid state, if the fold has not been rejected.
    pub fn valid(&self) -> Option<&ChainState> {
        match self {
            FoldState::Valid(state) => Some(state),
            _ => None,
        }
    }

    /// The rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            FoldState::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Whether the fold has been rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, FoldState::Rejected(_))
    }
}

impl From<ChainState> for FoldState {
    fn from(state: ChainState) -> Self {
        FoldState::Valid(state)
    }
}
