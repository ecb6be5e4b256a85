//! # Chain Verifier Service
//!
//! Application service running the per-link pipeline
//! (decode, linkage, body, signer, anchor, fold) and folding chains.
//!
//! ## Pipeline per link
//!
//! | Step | Check | Error |
//! |------|-------|-------|
//! | 1 | size limit, canonical outer decode | `Codec` |
//! | 2 | chain type, seqno, prev, curr, inner digest | `Linkage` |
//! | 3 | link type known and legal (or skipped, never as the first link) | `Body` |
//! | 4 | decrypt (if sealed), canonical inner decode, body decode | `Decryption` / `Codec` / `Body` |
//! | 5 | signer claim, signing authority, ctime order, key validity, signature over outer bytes | `Signer` |
//! | 6 | merkle anchor, parent-chain tail | `Anchor` |
//! | 7 | fold rule | `Apply` |
//! | 8 | owner of a newly opened chain matches the batch principal | `Linkage` |

use std::borrow::Cow;
use std::sync::Arc;

use rayon::prelude::*;
use sigchain_telemetry::{
    metric_inc, HistogramTimer, CHAINS_REJECTED, CHAINS_VERIFIED, FOLD_DURATION, LINKS_FOLDED,
    LINKS_SKIPPED,
};
use tracing::{debug, info, warn};

use crate::algorithms::{
    accept_link, check_anchor, check_anchor_recency, check_authority, check_claim,
    check_parent_tail, check_publication, classify_link, decode_body, resolve_signer, skip_link,
    verify_chain_type, verify_inner_attestation, verify_link_signature, verify_linkage,
};
use crate::codec::{decode_inner_link, decode_outer_link};
use crate::config::VerifierConfig;
use crate::domain::{
    AnchorError, BodyError, ChainBatch, ChainError, ChainState, CodecError, DecryptionError,
    FoldState, InnerLink, LinkageError, OuterLink, PrincipalId, RawLink, Rejection, Seqno,
};
use crate::ports::{
    InnerLinkDecryptor, RootPublicationOracle, SigchainVerifierApi, SignerKeyProvider,
};

/// Chain verifier - orchestrates link verification and state folding.
///
/// Holds only read-only collaborators, so one verifier can fold many
/// chains concurrently.
#[derive(Clone)]
pub struct ChainVerifier {
    /// Configuration.
    config: VerifierConfig,
    /// Settled signer keys.
    signer_keys: Arc<dyn SignerKeyProvider>,
    /// Root of trust for merkle anchors.
    roots: Option<Arc<dyn RootPublicationOracle>>,
    /// Opens encrypted inner links.
    decryptor: Option<Arc<dyn InnerLinkDecryptor>>,
}

impl ChainVerifier {
    /// Create a verifier without a root oracle or decryptor.
    pub fn new(config: VerifierConfig, signer_keys: Arc<dyn SignerKeyProvider>) -> Self {
        Self {
            config,
            signer_keys,
            roots: None,
            decryptor: None,
        }
    }

    /// Check every merkle anchor against a root of trust.
    pub fn with_root_oracle(mut self, roots: Arc<dyn RootPublicationOracle>) -> Self {
        self.roots = Some(roots);
        self
    }

    /// Open encrypted inner links with `decryptor`.
    pub fn with_decryptor(mut self, decryptor: Arc<dyn InnerLinkDecryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    fn check_size(&self, bytes: &[u8]) -> Result<(), CodecError> {
        if bytes.len() > self.config.max_link_bytes {
            return Err(CodecError::Oversized {
                size: bytes.len(),
                limit: self.config.max_link_bytes,
            });
        }
        Ok(())
    }

    fn open_inner<'a>(
        &self,
        outer: &OuterLink,
        transmitted: &'a [u8],
    ) -> Result<Cow<'a, [u8]>, DecryptionError> {
        let Some(params) = &outer.encryption_parameters else {
            return Ok(Cow::Borrowed(transmitted));
        };
        let decryptor = self.decryptor.as_ref().ok_or(DecryptionError::NoDecryptor)?;
        decryptor.decrypt(params, transmitted).map(Cow::Owned)
    }

    fn check_anchors(&self, inner: &InnerLink, prior: Option<&ChainState>) -> Result<(), AnchorError> {
        match &inner.merkle_root {
            Some(root) => {
                check_anchor(root, prior.and_then(ChainState::last_anchor))?;
                check_anchor_recency(root, inner.ctime, self.config.max_anchor_skew_secs)?;
                if let Some(oracle) = &self.roots {
                    check_publication(root, oracle.as_ref())?;
                }
            }
            None if self.config.require_merkle_anchor => return Err(AnchorError::Missing),
            None => {}
        }
        if let Some(tail) = &inner.parent_chain {
            check_parent_tail(tail, prior.and_then(ChainState::parent_tail))?;
        }
        Ok(())
    }

    /// Full per-link pipeline. `owner`, when set, is the principal the
    /// chain must belong to.
    fn verify_link(
        &self,
        prior: Option<&ChainState>,
        link: &RawLink,
        owner: Option<PrincipalId>,
    ) -> Result<ChainState, ChainError> {
        self.check_size(&link.outer)?;
        self.check_size(&link.inner)?;

        let outer = decode_outer_link(&link.outer)?;
        let expected_chain_type = prior
            .map(ChainState::chain_type)
            .or(self.config.expected_chain_type);
        verify_chain_type(&outer, expected_chain_type)?;
        verify_linkage(&outer, prior.map(ChainState::last_link))?;
        verify_inner_attestation(&outer, &link.inner)?;

        match (classify_link(outer.link_type, outer.chain_type), prior) {
            (Ok(_), _) => {}
            (Err(err), Some(prior)) if err.is_skippable() && outer.ignore_if_unsupported => {
                debug!(
                    seqno = %outer.seqno,
                    link_type = %outer.link_type,
                    "Skipping unsupported link"
                );
                metric_inc!(LINKS_SKIPPED);
                return Ok(skip_link(prior, outer));
            }
            (Err(err), None) if err.is_skippable() && outer.ignore_if_unsupported => {
                return Err(BodyError::FirstLinkUnsupported(outer.link_type).into())
            }
            (Err(err), _) => return Err(err.into()),
        }

        let plaintext = self.open_inner(&outer, &link.inner)?;
        let inner = decode_inner_link(&plaintext)?;
        let body = decode_body(outer.link_type, outer.chain_type, &inner.body)?;

        check_claim(&link.signer, &inner)?;
        check_authority(inner.signer, &body, prior)?;
        let key = resolve_signer(self.signer_keys.as_ref(), &link.signer, inner.ctime, prior)?;
        verify_link_signature(&key, &link.outer, &link.sig)?;

        self.check_anchors(&inner, prior)?;

        let link_type = outer.link_type;
        let next = accept_link(prior, outer, &inner, &body)?;
        if let Some(expected) = owner.filter(|expected| *expected != next.owner()) {
            return Err(LinkageError::OwnerMismatch {
                expected,
                actual: next.owner(),
            }
            .into());
        }
        debug!(
            seqno = %next.seqno(),
            link_type = %link_type,
            signer = %inner.signer,
            "Link accepted"
        );
        metric_inc!(LINKS_FOLDED, &[link_type.label()]);
        Ok(next)
    }

    /// Fold `links` from `start`, requiring `owner` when set.
    fn fold_owned(
        &self,
        start: FoldState,
        links: &[RawLink],
        owner: Option<PrincipalId>,
    ) -> FoldState {
        let _timer = HistogramTimer::new(&FOLD_DURATION);
        let mut state = start;
        for link in links {
            state = match state {
                FoldState::Rejected(_) => return state,
                FoldState::Empty => self.step(None, link, owner),
                FoldState::Valid(current) => self.step(Some(current), link, owner),
            };
        }

        if let FoldState::Valid(current) = &state {
            info!(
                seqno = %current.seqno(),
                tip = %current.tip(),
                owner = %current.owner(),
                skipped = current.skipped().len(),
                "Chain folded"
            );
            metric_inc!(CHAINS_VERIFIED);
        }
        state
    }

    /// One fold step from an owned prior state.
    fn step(
        &self,
        prior: Option<ChainState>,
        link: &RawLink,
        owner: Option<PrincipalId>,
    ) -> FoldState {
        match self.verify_link(prior.as_ref(), link, owner) {
            Ok(next) => FoldState::Valid(next),
            Err(error) => {
                let at_seqno = prior
                    .as_ref()
                    .map_or(Seqno::FIRST, |state| Seqno(state.seqno().value().saturating_add(1)));
                warn!(
                    at_seqno = %at_seqno,
                    category = error.category().label(),
                    error = %error,
                    "Link rejected"
                );
                metric_inc!(CHAINS_REJECTED, &[error.category().label()]);
                FoldState::Rejected(Rejection {
                    at_seqno,
                    error,
                    last_valid: prior,
                })
            }
        }
    }
}

impl SigchainVerifierApi for ChainVerifier {
    fn fold_link(
        &self,
        prior: Option<&ChainState>,
        link: &RawLink,
    ) -> Result<ChainState, ChainError> {
        self.verify_link(prior, link, None)
    }

    fn fold(&self, start: FoldState, links: &[RawLink]) -> FoldState {
        self.fold_owned(start, links, None)
    }

    fn fold_batch(&self, batch: &ChainBatch) -> FoldState {
        self.fold_owned(FoldState::Empty, &batch.links, batch.principal)
    }

    fn verify_many(&self, batches: &[ChainBatch]) -> Vec<FoldState> {
        batches.par_iter().map(|batch| self.fold_batch(batch)).collect()
    }
}
