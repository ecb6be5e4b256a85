//! # Merkle Anchor Attacks
//!
//! Links that try to present a stale, forked or unpublished view of the
//! public merkle tree.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sigchain_verifier::{
        AnchorError, ChainError, ChainType, LinkDraft, LinkId, MerkleRoot, PublishedRoots, Seqno,
        SigchainVerifierApi, Tail, VerifierConfig,
    };

    use crate::fixtures::*;

    fn root(seqno: u64, ctime: u64, fill: u8) -> MerkleRoot {
        MerkleRoot {
            hash: vec![fill; 32],
            seqno,
            ctime,
        }
    }

    fn anchored(roots: &[MerkleRoot]) -> ChainBuilder {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        for (i, root) in roots.iter().enumerate() {
            let ctime = 1_000 + i as u64;
            builder.push(
                &alice,
                LinkDraft::new(follow(BOB, i as u64 + 1), ctime).with_merkle_root(root.clone()),
            );
        }
        builder
    }

    fn error_of(builder: &ChainBuilder) -> ChainError {
        verifier()
            .fold_chain(&builder.raw())
            .rejection()
            .expect("chain must reject")
            .error
            .clone()
    }

    #[test]
    fn test_equivocating_root_rejected() {
        let builder = anchored(&[root(100, 900, 1), root(100, 900, 2)]);
        assert_eq!(
            error_of(&builder),
            ChainError::Anchor(AnchorError::Equivocation(100))
        );
    }

    #[test]
    fn test_root_time_rollback_rejected() {
        let builder = anchored(&[root(100, 900, 1), root(101, 800, 2)]);
        assert!(matches!(
            error_of(&builder),
            ChainError::Anchor(AnchorError::CtimeRegressed { .. })
        ));
    }

    #[test]
    fn test_root_from_future_rejected() {
        let builder = anchored(&[root(100, 5_000, 1)]);
        assert_eq!(
            error_of(&builder),
            ChainError::Anchor(AnchorError::FromFuture {
                root_ctime: 5_000,
                link_ctime: 1_000
            })
        );

        let mut config = VerifierConfig::for_testing();
        config.max_anchor_skew_secs = 4_000;
        let state = verifier_with(config, directory()).fold_chain(&builder.raw());
        assert!(state.valid().is_some());
    }

    #[test]
    fn test_unpublished_fork_rejected() {
        let honest = root(100, 900, 1);
        let fork = root(101, 950, 9);
        let published: PublishedRoots = vec![honest.clone(), root(101, 950, 2)].into_iter().collect();
        let builder = anchored(&[honest, fork]);

        let state = verifier()
            .with_root_oracle(Arc::new(published))
            .fold_chain(&builder.raw());
        let rejection = state.rejection().unwrap();
        assert_eq!(rejection.at_seqno, Seqno(2));
        assert_eq!(rejection.error, ChainError::Anchor(AnchorError::Unpublished(101)));
    }

    #[test]
    fn test_parent_tail_rollback_rejected() {
        let tail = |seqno: u64, fill: u8| Tail {
            chain_type: ChainType::TeamPrivate,
            seqno: Seqno(seqno),
            hash: LinkId([fill; 32]),
        };
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(BOB, 1), 1).with_parent_chain(tail(7, 1)))
            .push(&alice, LinkDraft::new(follow(BOB, 2), 2).with_parent_chain(tail(6, 2)));
        assert!(matches!(
            error_of(&builder),
            ChainError::Anchor(AnchorError::ParentTailRegressed { .. })
        ));
    }
}
