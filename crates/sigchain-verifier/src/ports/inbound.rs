//! # Inbound Ports
//!
//! API trait defining what the chain verifier can do.

use crate::domain::{ChainBatch, ChainError, ChainState, FoldState, RawLink};

/// Sigchain verifier API - inbound port.
///
/// Every operation is a pure function of its inputs and the read-only
/// collaborators the implementation was built with.
pub trait SigchainVerifierApi: Send + Sync {
    /// Verify one link against the state after the previous link.
    ///
    /// `prior` is `None` for the first link of a chain. The prior state is
    /// never modified; on success a new snapshot is returned.
    fn fold_link(&self, prior: Option<&ChainState>, link: &RawLink)
        -> Result<ChainState, ChainError>;

    /// Fold links left to right from `start`, halting at the first fatal
    /// error. A `Rejected` start is returned unchanged.
    fn fold(&self, start: FoldState, links: &[RawLink]) -> FoldState;

    /// Fold a whole chain from the empty state.
    fn fold_chain(&self, links: &[RawLink]) -> FoldState {
        self.fold(FoldState::Empty, links)
    }

    /// Fold a batch from the empty state. When the batch names a principal,
    /// the chain must belong to it: a chain opened by anyone else is
    /// rejected at its first link.
    fn fold_batch(&self, batch: &ChainBatch) -> FoldState;

    /// Fold independent chains with [`SigchainVerifierApi::fold_batch`],
    /// one result per batch in input order.
    fn verify_many(&self, batches: &[ChainBatch]) -> Vec<FoldState>;
}
