//! # Link Identity
//!
//! LinkIDs and the hash-linkage checks that form the tamper-detection
//! boundary. Nothing here repairs a mismatch.

use shared_crypto::sha256;

use crate::codec::outer_canonical_preimage;
use crate::domain::{ChainType, CodecError, LinkId, LinkageError, OuterLink, Seqno};

/// SHA-256 of an encoding.
pub fn compute_link_id(bytes: &[u8]) -> LinkId {
    LinkId(sha256(bytes))
}

/// The `curr` a link must declare: the digest of its canonical preimage.
pub fn compute_curr(link: &OuterLink) -> Result<LinkId, CodecError> {
    Ok(compute_link_id(&outer_canonical_preimage(link)?))
}

/// Check a candidate against the previously accepted link.
///
/// # Checks (in order)
///
/// 1. Seqno continuity: 1 for the first link, previous + 1 afterwards
/// 2. `prev` absent on the first link, equal to the previous `curr` afterwards
/// 3. `curr` equals the recomputed digest of the candidate
pub fn verify_linkage(
    candidate: &OuterLink,
    previous: Option<&OuterLink>,
) -> Result<(), LinkageError> {
    let expected = match previous {
        None => Seqno::FIRST,
        Some(previous) => previous
            .seqno
            .next()
            .ok_or(LinkageError::SeqnoOverflow(previous.seqno))?,
    };
    if candidate.seqno != expected {
        return Err(LinkageError::SeqnoMismatch {
            expected,
            actual: candidate.seqno,
        });
    }

    match (previous, candidate.prev) {
        (None, None) => {}
        (None, Some(_)) => return Err(LinkageError::UnexpectedPrev),
        (Some(_), None) => return Err(LinkageError::MissingPrev),
        (Some(previous), Some(prev)) => {
            if prev != previous.curr {
                return Err(LinkageError::PrevMismatch {
                    expected: previous.curr,
                    actual: prev,
                });
            }
        }
    }

    // A link that cannot be re-encoded cannot have a matching digest.
    let computed = compute_curr(candidate).map_err(|_| LinkageError::CurrMismatch {
        claimed: candidate.curr,
        computed: LinkId([0u8; 32]),
    })?;
    if computed != candidate.curr {
        return Err(LinkageError::CurrMismatch {
            claimed: candidate.curr,
            computed,
        });
    }

    Ok(())
}

/// Check that the inner bytes (plaintext or ciphertext, as transmitted)
/// are the ones the outer link attests.
pub fn verify_inner_attestation(outer: &OuterLink, inner_bytes: &[u8]) -> Result<(), LinkageError> {
    if compute_link_id(inner_bytes) == outer.inner {
        Ok(())
    } else {
        Err(LinkageError::InnerHashMismatch)
    }
}

/// Check the candidate's chain type against the established one.
pub fn verify_chain_type(
    candidate: &OuterLink,
    expected: Option<ChainType>,
) -> Result<(), LinkageError> {
    match expected {
        Some(expected) if expected != candidate.chain_type => {
            Err(LinkageError::ChainTypeMismatch {
                expected,
                actual: candidate.chain_type,
            })
        }
        _ => Ok(()),
    }
}
