//! # Merkle Anchor Checker
//!
//! Structural and monotonicity checks for merkle anchors and parent-chain
//! tails. Whether a root was really published is delegated to a
//! [`RootPublicationOracle`].

use crate::domain::{AnchorError, MerkleRoot, Tail, LINK_ID_LEN};
use crate::ports::RootPublicationOracle;

/// Check a claimed anchor against the last anchor accepted in this chain.
///
/// # Checks (in order)
///
/// 1. Hash is 32 bytes, seqno is non-zero
/// 2. Seqno does not decrease
/// 3. Ctime does not decrease
/// 4. Same seqno implies same hash
pub fn check_anchor(claimed: &MerkleRoot, prior: Option<&MerkleRoot>) -> Result<(), AnchorError> {
    if claimed.hash.len() != LINK_ID_LEN {
        return Err(AnchorError::InvalidHashLength(claimed.hash.len()));
    }
    if claimed.seqno == 0 {
        return Err(AnchorError::ZeroSeqno);
    }

    let Some(prior) = prior else {
        return Ok(());
    };

    if claimed.seqno < prior.seqno {
        return Err(AnchorError::SeqnoRegressed {
            previous: prior.seqno,
            claimed: claimed.seqno,
        });
    }
    if claimed.ctime < prior.ctime {
        return Err(AnchorError::CtimeRegressed {
            previous: prior.ctime,
            claimed: claimed.ctime,
        });
    }
    if claimed.seqno == prior.seqno && claimed.hash != prior.hash {
        return Err(AnchorError::Equivocation(claimed.seqno));
    }

    Ok(())
}

/// An anchor may not postdate the link that embeds it by more than
/// `max_skew_secs`.
pub fn check_anchor_recency(
    claimed: &MerkleRoot,
    link_ctime: u64,
    max_skew_secs: u64,
) -> Result<(), AnchorError> {
    if claimed.ctime > link_ctime.saturating_add(max_skew_secs) {
        return Err(AnchorError::FromFuture {
            root_ctime: claimed.ctime,
            link_ctime,
        });
    }
    Ok(())
}

/// Ask the root of trust whether the anchor was published.
pub fn check_publication(
    claimed: &MerkleRoot,
    oracle: &dyn RootPublicationOracle,
) -> Result<(), AnchorError> {
    if oracle.is_published(claimed) {
        Ok(())
    } else {
        Err(AnchorError::Unpublished(claimed.seqno))
    }
}

/// Check a parent-chain tail against the last one accepted in this chain:
/// same chain type, non-decreasing seqno, same seqno implies same hash.
pub fn check_parent_tail(claimed: &Tail, prior: Option<&Tail>) -> Result<(), AnchorError> {
    let Some(prior) = prior else {
        return Ok(());
    };

    if claimed.chain_type != prior.chain_type {
        return Err(AnchorError::ParentTailChainType {
            previous: prior.chain_type,
            claimed: claimed.chain_type,
        });
    }
    if claimed.seqno < prior.seqno {
        return Err(AnchorError::ParentTailRegressed {
            previous: prior.seqno,
            claimed: claimed.seqno,
        });
    }
    if claimed.seqno == prior.seqno && claimed.hash != prior.hash {
        return Err(AnchorError::ParentTailEquivocation(claimed.seqno));
    }

    Ok(())
}
