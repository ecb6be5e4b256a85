//! # Signing Key Attacks
//!
//! An attacker holding some key material, or replaying links signed with
//! keys that were valid once.
//!
//! | Attack | Expected |
//! |--------|----------|
//! | Sign with an unregistered key | `InvalidSignature` |
//! | Sign after the key was revoked | `KeyRevoked` |
//! | Sign with a superseded generation | `KeySuperseded` |
//! | Fall back to an older generation mid-chain | `GenerationRegressed` |
//! | Claim a different signer than the inner link | `ClaimMismatch` |
//! | Claim a generation the directory does not know | `UnknownSigner` |
//! | Backdate a link to a time the replaced key was still good | `CtimeRegressed` |

#[cfg(test)]
mod tests {
    use shared_crypto::Ed25519KeyPair;
    use sigchain_verifier::{
        BodyVariant, ChainError, ChainType, KeyDirectory, KeyGeneration, LinkDraft, LinkProducer,
        RawLink, Seqno, SigchainVerifierApi, SignerError, TeamRole, VerifierConfig,
    };

    use crate::fixtures::*;

    fn rejection_error(keys: KeyDirectory, links: &[RawLink]) -> ChainError {
        verifier_with(VerifierConfig::for_testing(), keys)
            .fold_chain(links)
            .rejection()
            .expect("chain must reject")
            .error
            .clone()
    }

    #[test]
    fn test_stolen_identity_wrong_key() {
        let mallory = LinkProducer::new(
            ChainType::UserPrivate,
            ALICE,
            KeyGeneration(1),
            Ed25519KeyPair::from_seed([0xee; 32]),
        );
        let mut builder = ChainBuilder::new();
        builder.push(&mallory, LinkDraft::new(follow(BOB, 1), 1));
        assert_eq!(
            rejection_error(directory(), &builder.raw()),
            ChainError::Signer(SignerError::InvalidSignature)
        );
    }

    #[test]
    fn test_revoked_key_rejected_from_revocation_time() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(BOB, 1), 100))
            .push(&alice, LinkDraft::new(follow(BOB, 2), 200));

        let mut keys = directory();
        keys.revoke(ALICE, KeyGeneration(1), 150);

        let state = verifier_with(VerifierConfig::for_testing(), keys).fold_chain(&builder.raw());
        let rejection = state.rejection().unwrap();
        assert_eq!(rejection.last_valid.as_ref().unwrap().seqno().value(), 1);
        assert_eq!(
            rejection.error,
            ChainError::Signer(SignerError::KeyRevoked {
                generation: KeyGeneration(1),
                revoked_at: 150,
                ctime: 200
            })
        );
    }

    #[test]
    fn test_superseded_key_after_rotation() {
        let old = producer_at(ChainType::UserPrivate, ALICE, 1);
        let mut keys = directory();
        keys.rotate(ALICE, keypair(ALICE, 2).public_key(), 150);

        let mut builder = ChainBuilder::new();
        builder
            .push(&old, LinkDraft::new(follow(BOB, 1), 100))
            .push(&old, LinkDraft::new(follow(BOB, 2), 200));
        assert!(matches!(
            rejection_error(keys, &builder.raw()),
            ChainError::Signer(SignerError::KeySuperseded { superseded_at: 150, .. })
        ));
    }

    #[test]
    fn test_rotation_then_new_generation_accepted() {
        let old = producer_at(ChainType::UserPrivate, ALICE, 1);
        let new = producer_at(ChainType::UserPrivate, ALICE, 2);
        let mut keys = directory();
        keys.rotate(ALICE, keypair(ALICE, 2).public_key(), 150);

        let mut builder = ChainBuilder::new();
        builder
            .push(&old, LinkDraft::new(follow(BOB, 1), 100))
            .push(&new, LinkDraft::new(follow(BOB, 2), 200));
        let state = verifier_with(VerifierConfig::for_testing(), keys).fold_chain(&builder.raw());
        let current = state.valid().expect("rotated chain should fold");
        assert_eq!(current.signer_generation(&ALICE), Some(KeyGeneration(2)));
    }

    #[test]
    fn test_generation_rollback_rejected() {
        let old = producer_at(ChainType::UserPrivate, ALICE, 1);
        let new = producer_at(ChainType::UserPrivate, ALICE, 2);
        // Both keys valid for the whole test window; only the chain history forbids the fallback.
        let mut keys = directory();
        keys.register(ALICE, KeyGeneration(2), keypair(ALICE, 2).public_key());

        let mut builder = ChainBuilder::new();
        builder
            .push(&new, LinkDraft::new(follow(BOB, 1), 100))
            .push(&old, LinkDraft::new(follow(BOB, 2), 200));
        assert_eq!(
            rejection_error(keys, &builder.raw()),
            ChainError::Signer(SignerError::GenerationRegressed {
                principal: ALICE,
                previous: KeyGeneration(2),
                claimed: KeyGeneration(1)
            })
        );
    }

    #[test]
    fn test_forged_claim_rejected() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder.push(&alice, LinkDraft::new(follow(BOB, 1), 1));
        let mut links = builder.raw();
        links[0].signer.key_generation = KeyGeneration(2);
        assert_eq!(
            rejection_error(directory(), &links),
            ChainError::Signer(SignerError::ClaimMismatch)
        );
    }

    #[test]
    fn test_unknown_generation() {
        let future = producer_at(ChainType::UserPrivate, ALICE, 5);
        let mut builder = ChainBuilder::new();
        builder.push(&future, LinkDraft::new(follow(BOB, 1), 1));
        assert!(matches!(
            rejection_error(directory(), &builder.raw()),
            ChainError::Signer(SignerError::UnknownSigner { .. })
        ));
    }

    #[test]
    fn test_backdated_link_with_replaced_key_rejected() {
        // ALICE's first key was replaced at 150. BOB opens the team at 200;
        // ALICE then signs with the old key and claims ctime 100.
        let mut keys = directory();
        keys.rotate(ALICE, keypair(ALICE, 2).public_key(), 150);
        let bob = producer(ChainType::TeamPrivate, BOB);
        let old = producer_at(ChainType::TeamPrivate, ALICE, 1);

        let mut builder = ChainBuilder::new();
        builder
            .push(
                &bob,
                LinkDraft::new(team_root(&[(ALICE, TeamRole::Owner), (BOB, TeamRole::Admin)]), 200),
            )
            .push(&old, LinkDraft::new(BodyVariant::TeamPtk(rotation(1)), 100));

        let state = verifier_with(VerifierConfig::for_testing(), keys).fold_chain(&builder.raw());
        let rejection = state.rejection().expect("backdated link must reject");
        assert_eq!(rejection.at_seqno, Seqno(2));
        assert_eq!(
            rejection.error,
            ChainError::Signer(SignerError::CtimeRegressed {
                previous: 200,
                ctime: 100
            })
        );
        assert!(rejection.last_valid.as_ref().unwrap().team_view().unwrap().per_team_keys.is_empty());
    }

    #[test]
    fn test_honest_ctime_exposes_replaced_key() {
        let mut keys = directory();
        keys.rotate(ALICE, keypair(ALICE, 2).public_key(), 150);
        let bob = producer(ChainType::TeamPrivate, BOB);
        let old = producer_at(ChainType::TeamPrivate, ALICE, 1);

        let mut builder = ChainBuilder::new();
        builder
            .push(
                &bob,
                LinkDraft::new(team_root(&[(ALICE, TeamRole::Owner), (BOB, TeamRole::Admin)]), 200),
            )
            .push(&old, LinkDraft::new(BodyVariant::TeamPtk(rotation(1)), 200));
        assert!(matches!(
            rejection_error(keys, &builder.raw()),
            ChainError::Signer(SignerError::KeySuperseded { superseded_at: 150, ctime: 200, .. })
        ));
    }
}
