//! # Signer Resolver
//!
//! Maps a claimed signer (principal + key generation) to the key valid for
//! it when the link was made, then checks the link's signature.
//!
//! The resolver only reads settled signer state through
//! [`SignerKeyProvider`]; it never verifies the signer's own chain.
//!
//! Key validity is judged at the link's own ctime, so ctime may never run
//! backwards along a chain: a link cannot borrow an earlier moment at which
//! a since-replaced key was still good.

use shared_crypto::{Ed25519PublicKey, Ed25519Signature};

use crate::domain::{
    BodyVariant, ChainState, ChainView, InnerLink, PrincipalId, SignerClaim, SignerError,
};
use crate::ports::{SignerKeyProvider, SignerQuery};

/// Resolve the verification key for a signer at time `at`.
///
/// `as_of` is the chain state immediately before the link; a signer may not
/// fall back to a generation lower than one it already used in this chain.
///
/// # Errors
///
/// - `CtimeRegressed`: `at` is earlier than the previous link's ctime
/// - `GenerationRegressed`: lower generation than already used here
/// - `UnknownSigner`: provider has no key
/// - `GenerationMismatch`: provider returned another generation
/// - `KeyRevoked` / `KeySuperseded`: key no longer valid at `at`
pub fn resolve_signer(
    provider: &dyn SignerKeyProvider,
    claim: &SignerClaim,
    at: u64,
    as_of: Option<&ChainState>,
) -> Result<Ed25519PublicKey, SignerError> {
    check_ctime(at, as_of.and_then(ChainState::last_ctime))?;

    if let Some(previous) = as_of.and_then(|state| state.signer_generation(&claim.principal)) {
        if claim.key_generation < previous {
            return Err(SignerError::GenerationRegressed {
                principal: claim.principal,
                previous,
                claimed: claim.key_generation,
            });
        }
    }

    let record = provider
        .lookup(&SignerQuery {
            principal: claim.principal,
            generation: claim.key_generation,
            at,
        })
        .ok_or(SignerError::UnknownSigner {
            principal: claim.principal,
            generation: claim.key_generation,
        })?;

    if record.generation != claim.key_generation {
        return Err(SignerError::GenerationMismatch {
            claimed: claim.key_generation,
            actual: record.generation,
        });
    }

    // Revocation outranks supersession when both apply.
    if let Some(revoked_at) = record.revoked_at.filter(|revoked_at| *revoked_at <= at) {
        return Err(SignerError::KeyRevoked {
            generation: record.generation,
            revoked_at,
            ctime: at,
        });
    }
    if let Some(superseded_at) = record.superseded_at.filter(|superseded_at| *superseded_at <= at) {
        return Err(SignerError::KeySuperseded {
            generation: record.generation,
            superseded_at,
            ctime: at,
        });
    }

    Ok(record.key)
}

/// Link ctimes are non-decreasing along a chain. Equal ctimes are allowed.
pub fn check_ctime(ctime: u64, previous: Option<u64>) -> Result<(), SignerError> {
    match previous {
        Some(previous) if ctime < previous => Err(SignerError::CtimeRegressed { previous, ctime }),
        _ => Ok(()),
    }
}

/// Whether `signer` may extend the chain with `body`.
///
/// A user chain is signed by its owner only. A team chain is signed by
/// current members; the root is signed by one of the members it founds.
/// Roles are recorded but not enforced.
pub fn check_authority(
    signer: PrincipalId,
    body: &BodyVariant,
    prior: Option<&ChainState>,
) -> Result<(), SignerError> {
    match (prior, body) {
        (None, BodyVariant::TeamRoot(root)) if !root.members.contains_key(&signer) => {
            Err(SignerError::NotTeamMember(signer))
        }
        (None, _) => Ok(()),
        (Some(state), _) => match state.view() {
            ChainView::User(_) if signer != state.owner() => Err(SignerError::NotChainOwner {
                owner: state.owner(),
                signer,
            }),
            ChainView::Team(team) if !team.members.contains_key(&signer) => {
                Err(SignerError::NotTeamMember(signer))
            }
            _ => Ok(()),
        },
    }
}

/// Out-of-band signer metadata must agree with the signed inner link.
pub fn check_claim(claim: &SignerClaim, inner: &InnerLink) -> Result<(), SignerError> {
    if claim.principal == inner.signer && claim.key_generation == inner.signing_key_seqno {
        Ok(())
    } else {
        Err(SignerError::ClaimMismatch)
    }
}

/// Verify an Ed25519 signature over the exact outer-link bytes.
pub fn verify_link_signature(
    key: &Ed25519PublicKey,
    outer_bytes: &[u8],
    sig: &[u8],
) -> Result<(), SignerError> {
    let signature = Ed25519Signature::from_slice(sig).map_err(|_| SignerError::InvalidSignature)?;
    key.verify(outer_bytes, &signature)
        .map_err(|_| SignerError::InvalidSignature)
}
