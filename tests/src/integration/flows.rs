//! # Integration Test Flows
//!
//! Full folds through `ChainVerifier`, from produced bytes to chain state.
//!
//! ## Flows Tested:
//!
//! 1. **Scenario A**: a single passive follow folds from `Empty`
//! 2. **Scenario B**: a duplicate seqno rejects, leaving the first link's state
//! 3. **Scenario C**: a merkle root rollback rejects with an anchor error
//! 4. **Teams and follows**: a team opens with its root, members leave, follows are dropped
//! 5. **Checkpoints**: resuming from a snapshot equals a full fold
//! 6. **Batches**: JSON batches and parallel verification of many chains
//! 7. **Telemetry**: fold outcomes reach the Prometheus registry

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_crypto::SecretKey;
    use sigchain_verifier::{
        compute_curr, seal_link, AnchorError, ApplyError, BodyVariant, ChainBatch, ChainError,
        ChainState, ChainType, ErrorCategory, FoldState, KeyGeneration, Keyring, LinkBatch,
        LinkDraft, LinkType, LinkageError, MerkleRoot, Seqno, SigchainVerifierApi, TeamRole,
    };

    use crate::fixtures::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn root(seqno: u64, ctime: u64) -> MerkleRoot {
        MerkleRoot {
            hash: vec![seqno as u8; 32],
            seqno,
            ctime,
        }
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_scenario_a_single_follow() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder.push(&alice, LinkDraft::new(follow(BOB, 3), 1_700_000_000));

        let state = verifier().fold_chain(&builder.raw());
        let current = state.valid().expect("chain should fold");
        assert_eq!(current.seqno(), Seqno(1));
        assert!(builder.sealed()[0].outer.prev.is_none());
        let user = current.user_view().unwrap();
        assert_eq!(user.follows.len(), 1);
        assert_eq!(user.follows.get(&BOB), Some(&Seqno(3)));
    }

    #[test]
    fn test_scenario_b_duplicate_seqno() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(BOB, 3), 1))
            .push(&alice, LinkDraft::new(follow(CAROL, 1), 2));

        // Re-seal the second link claiming seqno 1 with a self-consistent curr.
        let second = &builder.sealed()[1];
        let mut duplicate = second.outer.clone();
        duplicate.seqno = Seqno(1);
        duplicate.curr = compute_curr(&duplicate).unwrap();
        let forged = seal_link(&duplicate, second.raw.inner.clone(), alice.keypair(), alice.claim())
            .unwrap();

        let verifier = verifier();
        let first_only = verifier.fold_chain(&builder.raw()[..1]);
        let state = verifier.fold_chain(&[builder.raw()[0].clone(), forged]);

        let rejection = state.rejection().expect("duplicate seqno must reject");
        assert_eq!(rejection.at_seqno, Seqno(2));
        assert_eq!(
            rejection.error,
            ChainError::Linkage(LinkageError::SeqnoMismatch {
                expected: Seqno(2),
                actual: Seqno(1)
            })
        );
        assert_eq!(rejection.last_valid.as_ref(), first_only.valid());
    }

    #[test]
    fn test_scenario_c_root_rollback() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(BOB, 1), 1_000).with_merkle_root(root(100, 900)))
            .push(&alice, LinkDraft::new(follow(BOB, 2), 1_001).with_merkle_root(root(90, 950)));

        let state = verifier().fold_chain(&builder.raw());
        let rejection = state.rejection().expect("rollback must reject");
        assert_eq!(rejection.at_seqno, Seqno(2));
        assert_eq!(
            rejection.error,
            ChainError::Anchor(AnchorError::SeqnoRegressed {
                previous: 100,
                claimed: 90
            })
        );
        assert_eq!(rejection.error.category(), ErrorCategory::Anchor);
    }

    // =============================================================================
    // SEQUENTIAL INTEGRITY
    // =============================================================================

    #[test]
    fn test_rejection_at_every_position() {
        let links = user_chain(6);
        let verifier = verifier();
        for k in 0..links.len() {
            let mut broken = links.clone();
            broken[k].sig[10] ^= 0x40;
            let state = verifier.fold_chain(&broken);
            let rejection = state.rejection().expect("broken link must reject");
            assert_eq!(rejection.at_seqno, Seqno(k as u64 + 1));
            assert_eq!(
                rejection.last_valid.as_ref().map(ChainState::seqno),
                (k > 0).then_some(Seqno(k as u64))
            );
        }
    }

    #[test]
    fn test_incremental_fold_matches_whole_chain() {
        let links = user_chain(8);
        let verifier = verifier();
        let whole = verifier.fold_chain(&links);

        let mut state = FoldState::Empty;
        for link in &links {
            state = verifier.fold(state, std::slice::from_ref(link));
        }
        assert_eq!(state, whole);
        assert_eq!(whole.seqno(), Some(Seqno(8)));
    }

    #[test]
    fn test_refold_is_bit_identical() {
        let links = user_chain(5);
        let verifier = verifier();
        let first = verifier.fold_chain(&links);
        let second = verifier.fold_chain(&links);
        assert_eq!(
            first.valid().unwrap().to_snapshot_bytes().unwrap(),
            second.valid().unwrap().to_snapshot_bytes().unwrap()
        );
    }

    // =============================================================================
    // TEAM CHAINS
    // =============================================================================

    #[test]
    fn test_team_lifecycle() {
        let alice = producer(ChainType::TeamPrivate, ALICE);
        let bob = producer(ChainType::TeamPrivate, BOB);
        let mut builder = ChainBuilder::new();
        builder
            .push(
                &alice,
                LinkDraft::new(team_root(&[(ALICE, TeamRole::Owner), (BOB, TeamRole::Admin)]), 10),
            )
            .push(&alice, LinkDraft::new(BodyVariant::TeamPtk(rotation(1)), 11))
            .push(&bob, LinkDraft::new(membership(&[(CAROL, TeamRole::Writer)], &[ALICE]), 12))
            .push(&bob, LinkDraft::new(BodyVariant::TeamPtk(rotation(2)), 13));

        let state = verifier().fold_chain(&builder.raw());
        let current = state.valid().expect("team chain should fold");
        assert_eq!(current.owner(), TEAM);
        let team = current.team_view().unwrap();
        assert!(!team.members.contains_key(&ALICE));
        assert_eq!(team.members.get(&BOB), Some(&TeamRole::Admin));
        assert_eq!(team.members.get(&CAROL), Some(&TeamRole::Writer));
        assert_eq!(team.current_generation(), Some(KeyGeneration(2)));
        assert_eq!(current.signer_generations().len(), 2);
    }

    #[test]
    fn test_team_leave_flow() {
        let alice = producer(ChainType::TeamPrivate, ALICE);
        let carol = producer(ChainType::TeamPrivate, CAROL);
        let mut builder = ChainBuilder::new();
        builder
            .push(
                &alice,
                LinkDraft::new(team_root(&[(ALICE, TeamRole::Owner), (CAROL, TeamRole::Reader)]), 1),
            )
            .push(&carol, LinkDraft::new(BodyVariant::TeamLeave, 2))
            .push(&carol, LinkDraft::new(BodyVariant::TeamLeave, 3));

        let verifier = verifier();
        let left = verifier.fold_chain(&builder.raw()[..2]);
        let members = &left.valid().unwrap().team_view().unwrap().members;
        assert_eq!(members.keys().copied().collect::<Vec<_>>(), vec![ALICE]);

        let state = verifier.fold_chain(&builder.raw());
        let rejection = state.rejection().expect("second leave must reject");
        assert_eq!(rejection.at_seqno, Seqno(3));
        assert_eq!(rejection.error.category(), ErrorCategory::Signer);
    }

    #[test]
    fn test_follow_then_unfollow() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(BOB, 4), 1))
            .push(&alice, LinkDraft::new(follow(CAROL, 2), 2))
            .push(&alice, LinkDraft::new(unfollow(&[BOB]), 3))
            .push(&alice, LinkDraft::new(unfollow(&[BOB]), 4));

        let verifier = verifier();
        let state = verifier.fold_chain(&builder.raw()[..3]);
        let user = state.valid().unwrap().user_view().unwrap();
        assert!(!user.follows.contains_key(&BOB));
        assert_eq!(user.follows.get(&CAROL), Some(&Seqno(2)));

        let state = verifier.fold_chain(&builder.raw());
        assert_eq!(
            state.rejection().unwrap().error,
            ChainError::Apply(ApplyError::NotFollowed(BOB))
        );
    }

    #[test]
    fn test_skipped_links_keep_state() {
        let alice = producer(ChainType::UserPrivate, ALICE);
        let unknown = BodyVariant::Unrecognized {
            link_type: LinkType::Unknown(0x40),
            raw: vec![0x91, 0x01],
        };
        let mut with_skip = ChainBuilder::new();
        with_skip
            .push(&alice, LinkDraft::new(follow(BOB, 1), 1))
            .push(&alice, LinkDraft::new(unknown, 2).skippable());

        let verifier = verifier();
        let before = verifier.fold_chain(&with_skip.raw()[..1]);
        let after = verifier.fold_chain(&with_skip.raw());
        let before = before.valid().unwrap();
        let after = after.valid().unwrap();

        assert_eq!(after.seqno(), Seqno(2));
        assert_eq!(after.tip(), with_skip.sealed()[1].outer.curr);
        assert_eq!(after.view(), before.view());
        assert_eq!(after.skipped()[0].link_type, LinkType::Unknown(0x40));
    }

    // =============================================================================
    // CHECKPOINTS, BATCHES, PARALLELISM
    // =============================================================================

    #[test]
    fn test_checkpoint_resume() {
        let links = user_chain(10);
        let verifier = verifier();
        let full = verifier.fold_chain(&links);

        for split in 1..links.len() {
            let head = verifier.fold_chain(&links[..split]);
            let bytes = head.valid().unwrap().to_snapshot_bytes().unwrap();
            let restored = ChainState::from_snapshot_bytes(&bytes).unwrap();
            let resumed = verifier.fold(FoldState::Valid(restored), &links[split..]);
            assert_eq!(resumed, full);
        }
    }

    #[test]
    fn test_json_batch_flow() {
        let batch = ChainBatch::new(ALICE, user_chain(3));
        let json = LinkBatch::from(&batch).to_json().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["principal"], hex::encode(ALICE.as_bytes()));

        let batch = LinkBatch::from_json(&json).unwrap().into_chain_batch().unwrap();
        let state = verifier().fold_batch(&batch);
        assert_eq!(state.seqno(), Some(Seqno(3)));
    }

    #[test]
    fn test_verify_many_equals_sequential() {
        let mut batches: Vec<ChainBatch> = (1..=12)
            .map(|len| ChainBatch::new(ALICE, user_chain(len)))
            .collect();
        batches[4].links[2].inner[0] ^= 0x01;
        batches[9].links.swap(3, 4);

        let verifier = verifier();
        let parallel = verifier.verify_many(&batches);
        let sequential: Vec<FoldState> = batches
            .iter()
            .map(|batch| verifier.fold_batch(batch))
            .collect();
        assert_eq!(parallel, sequential);
        assert!(parallel[4].is_rejected());
        assert!(parallel[9].is_rejected());
        assert_eq!(parallel.iter().filter(|state| state.is_rejected()).count(), 2);
    }

    #[test]
    fn test_encrypted_chain_with_keyring() {
        let key = SecretKey::from_bytes([0x55; 32]);
        let alice = producer(ChainType::UserPrivate, ALICE).with_encryption(b"puk-1".to_vec(), key.clone());
        let mut builder = ChainBuilder::new();
        builder
            .push(&alice, LinkDraft::new(follow(BOB, 1), 1))
            .push(&alice, LinkDraft::new(BodyVariant::PerUserKey(rotation(1)), 2));

        let mut keyring = Keyring::new();
        keyring.insert(b"puk-1".to_vec(), key);
        let state = verifier()
            .with_decryptor(Arc::new(keyring))
            .fold_chain(&builder.raw());
        let user = state.valid().expect("encrypted chain should fold").user_view().unwrap();
        assert_eq!(user.per_user_key, Some(rotation(1)));

        let mut wrong = Keyring::new();
        wrong.insert(b"puk-1".to_vec(), SecretKey::from_bytes([0x56; 32]));
        let state = verifier()
            .with_decryptor(Arc::new(wrong))
            .fold_chain(&builder.raw());
        assert_eq!(state.rejection().unwrap().error.category(), ErrorCategory::Decode);
    }

    // =============================================================================
    // TELEMETRY
    // =============================================================================

    #[test]
    fn test_fold_outcomes_exported() {
        sigchain_telemetry::register_metrics().unwrap();
        let verified_before = sigchain_telemetry::CHAINS_VERIFIED.get();
        let signer_rejections_before = sigchain_telemetry::CHAINS_REJECTED
            .with_label_values(&["signer"])
            .get();

        let mut links = user_chain(2);
        assert!(verifier().fold_chain(&links).valid().is_some());
        links[1].sig[0] ^= 0x01;
        assert!(verifier().fold_chain(&links).is_rejected());

        assert!(sigchain_telemetry::CHAINS_VERIFIED.get() > verified_before);
        assert!(
            sigchain_telemetry::CHAINS_REJECTED
                .with_label_values(&["signer"])
                .get()
                > signer_rejections_before
        );
        let text = sigchain_telemetry::encode_metrics().unwrap();
        assert!(text.contains("sc_fold_links_folded_total"));
    }
}
