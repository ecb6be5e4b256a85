//! # Chain Ownership Attacks
//!
//! A principal with a valid key of their own tries to open, claim or
//! extend a chain that is not theirs.
//!
//! | Attack | Expected |
//! |--------|----------|
//! | Open a chain with an unsigned, skippable link | `FirstLinkUnsupported` |
//! | Submit one's own chain under another principal | `OwnerMismatch` |
//! | Append to another user's chain | `NotChainOwner` |
//! | Open a team chain without a root | `MissingTeamRoot` |
//! | Re-root an existing team | `RootNotFirst` |
//! | Sign a team link without membership | `NotTeamMember` |

#[cfg(test)]
mod tests {
    use sigchain_verifier::{
        ApplyError, BodyError, BodyVariant, ChainBatch, ChainError, ChainType, LinkDraft,
        LinkType, LinkageError, RawLink, Seqno, SigchainVerifierApi, SignerError, TeamRole,
    };

    use crate::fixtures::*;

    fn rejection_error(links: &[RawLink]) -> ChainError {
        verifier()
            .fold_chain(links)
            .rejection()
            .expect("chain must reject")
            .error
            .clone()
    }

    #[test]
    fn test_skippable_first_link_cannot_fix_chain_type() {
        let unknown = BodyVariant::Unrecognized {
            link_type: LinkType::Unknown(0x41),
            raw: vec![0x90],
        };
        for chain_type in [ChainType::TeamPrivate, ChainType::Unknown(0x55)] {
            let mallory = producer(chain_type, BOB);
            let mut builder = ChainBuilder::new();
            builder.push(&mallory, LinkDraft::new(unknown.clone(), 1).skippable());

            let state = verifier().fold_chain(&builder.raw());
            let rejection = state.rejection().expect("opaque opening must reject");
            assert_eq!(rejection.at_seqno, Seqno(1));
            assert_eq!(
                rejection.error,
                ChainError::Body(BodyError::FirstLinkUnsupported(LinkType::Unknown(0x41)))
            );
        }
    }

    #[test]
    fn test_foreign_chain_in_batch_rejected() {
        let bob = producer(ChainType::UserPrivate, BOB);
        let mut builder = ChainBuilder::new();
        builder
            .push(&bob, LinkDraft::new(follow(CAROL, 1), 1))
            .push(&bob, LinkDraft::new(follow(CAROL, 2), 2));

        let batches = vec![
            ChainBatch::new(ALICE, builder.raw()),
            ChainBatch::new(BOB, builder.raw()),
        ];
        let results = verifier().verify_many(&batches);

        let rejection = results[0].rejection().expect("foreign chain must reject");
        assert_eq!(rejection.at_seqno, Seqno(1));
        assert!(rejection.last_valid.is_none());
        assert_eq!(
            rejection.error,
            ChainError::Linkage(LinkageError::OwnerMismatch {
                expected: ALICE,
                actual: BOB
            })
        );
        assert_eq!(results[1].valid().map(|state| state.owner()), Some(BOB));
    }

    #[test]
    fn test_append_to_other_users_chain_rejected() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let bob = producer(ChainType::UserPrivate, BOB);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(CAROL, 1), 1))
            .push(&bob, LinkDraft::new(unfollow(&[CAROL]), 2));
        assert_eq!(
            rejection_error(&builder.raw()),
            ChainError::Signer(SignerError::NotChainOwner {
                owner: ALICE,
                signer: BOB
            })
        );
    }

    #[test]
    fn test_team_chain_without_root_rejected() {
        let bob = producer(ChainType::TeamPrivate, BOB);
        let mut builder = ChainBuilder::new();
        builder.push(&bob, LinkDraft::new(BodyVariant::TeamPtk(rotation(1)), 1));
        assert_eq!(
            rejection_error(&builder.raw()),
            ChainError::Apply(ApplyError::MissingTeamRoot(LinkType::TeamPtk))
        );
    }

    #[test]
    fn test_second_root_rejected() {
        let alice = producer(ChainType::TeamPrivate, ALICE);
        let takeover = team_root(&[(ALICE, TeamRole::Owner), (BOB, TeamRole::Owner)]);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(team_root(&[(ALICE, TeamRole::Owner)]), 1))
            .push(&alice, LinkDraft::new(takeover, 2));
        assert_eq!(
            rejection_error(&builder.raw()),
            ChainError::Apply(ApplyError::RootNotFirst)
        );
    }

    #[test]
    fn test_outsider_cannot_sign_team_links() {
        let alice = producer(ChainType::TeamPrivate, ALICE);
        let carol = producer(ChainType::TeamPrivate, CAROL);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(team_root(&[(ALICE, TeamRole::Owner)]), 1))
            .push(&carol, LinkDraft::new(membership(&[(CAROL, TeamRole::Admin)], &[]), 2));
        assert_eq!(
            rejection_error(&builder.raw()),
            ChainError::Signer(SignerError::NotTeamMember(CAROL))
        );
    }
}
