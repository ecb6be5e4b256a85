//! # Test Fixtures
//!
//! Deterministic principals, keys and chain builders.

use std::sync::Arc;

use shared_crypto::Ed25519KeyPair;
use sigchain_verifier::{
    BodyVariant, ChainType, ChainVerifier, FollowMap, KeyDirectory, KeyGeneration, KeyRotation,
    Kid, LinkDraft, LinkProducer, MembershipChange, PrincipalId, RawLink, SealedLink, Seqno,
    TeamRole, TeamRoot, VerifierConfig,
};

/// First user.
pub const ALICE: PrincipalId = PrincipalId([0xa1; 16]);
/// Second user.
pub const BOB: PrincipalId = PrincipalId([0xb2; 16]);
/// Third user.
pub const CAROL: PrincipalId = PrincipalId([0xc3; 16]);
/// A team.
pub const TEAM: PrincipalId = PrincipalId([0x7e; 16]);

/// Keypair for a principal at a generation. Same inputs, same key.
pub fn keypair(principal: PrincipalId, generation: u64) -> Ed25519KeyPair {
    let mut seed = [0u8; 32];
    seed[..16].copy_from_slice(principal.as_bytes());
    seed[16..24].copy_from_slice(&generation.to_be_bytes());
    Ed25519KeyPair::from_seed(seed)
}

/// Directory holding generation 1 for ALICE, BOB and CAROL.
pub fn directory() -> KeyDirectory {
    let mut directory = KeyDirectory::new();
    for principal in [ALICE, BOB, CAROL] {
        directory.register(principal, KeyGeneration(1), keypair(principal, 1).public_key());
    }
    directory
}

/// Verifier over [`directory`] with the testing config.
pub fn verifier() -> ChainVerifier {
    verifier_with(VerifierConfig::for_testing(), directory())
}

/// Verifier over a custom config and directory.
pub fn verifier_with(config: VerifierConfig, directory: KeyDirectory) -> ChainVerifier {
    ChainVerifier::new(config, Arc::new(directory))
}

/// Producer signing as `signer` with generation 1.
pub fn producer(chain_type: ChainType, signer: PrincipalId) -> LinkProducer {
    producer_at(chain_type, signer, 1)
}

/// Producer signing as `signer` with the given generation.
pub fn producer_at(chain_type: ChainType, signer: PrincipalId, generation: u64) -> LinkProducer {
    LinkProducer::new(
        chain_type,
        signer,
        KeyGeneration(generation),
        keypair(signer, generation),
    )
}

/// Passive follow of one principal.
pub fn follow(principal: PrincipalId, seqno: u64) -> BodyVariant {
    let mut follows = FollowMap::new();
    follows.insert(principal, Seqno(seqno));
    BodyVariant::PassiveFollow(follows)
}

/// Key rotation with kids derived from the generation.
pub fn rotation(generation: u64) -> KeyRotation {
    KeyRotation {
        generation: KeyGeneration(generation),
        encryption_kid: Kid([generation as u8; 32]),
        signing_kid: Kid([(generation as u8).wrapping_add(0x80); 32]),
    }
}

/// Membership change body.
pub fn membership(add: &[(PrincipalId, TeamRole)], remove: &[PrincipalId]) -> BodyVariant {
    BodyVariant::TeamChangeMembership(MembershipChange {
        add: add.iter().copied().collect(),
        remove: remove.iter().copied().collect(),
    })
}

/// Root of [`TEAM`] with its founding members.
pub fn team_root(members: &[(PrincipalId, TeamRole)]) -> BodyVariant {
    BodyVariant::TeamRoot(TeamRoot {
        team: TEAM,
        members: members.iter().copied().collect(),
    })
}

/// Unfollow body.
pub fn unfollow(principals: &[PrincipalId]) -> BodyVariant {
    BodyVariant::Unfollow(principals.iter().copied().collect())
}

/// Builds a chain link by link, each link chained to the previous one.
#[derive(Default)]
pub struct ChainBuilder {
    links: Vec<SealedLink>,
}

impl ChainBuilder {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link produced by `producer`.
    pub fn push(&mut self, producer: &LinkProducer, draft: LinkDraft) -> &mut Self {
        let tip = self.links.last().map(|link| &link.outer);
        let link = producer
            .produce(tip, draft)
            .expect("fixture link should be producible");
        self.links.push(link);
        self
    }

    /// Links produced so far.
    pub fn sealed(&self) -> &[SealedLink] {
        &self.links
    }

    /// Raw links for the verifier.
    pub fn raw(&self) -> Vec<RawLink> {
        self.links.iter().map(|link| link.raw.clone()).collect()
    }
}

/// A user chain of `len` passive follows by ALICE, ctime 1..=len.
pub fn user_chain(len: usize) -> Vec<RawLink> {
    let alice = producer(ChainType::UserPrivate, ALICE);
    let mut builder = ChainBuilder::new();
    for i in 0..len {
        let target = if i % 2 == 0 { BOB } else { CAROL };
        builder.push(&alice, LinkDraft::new(follow(target, i as u64 + 1), i as u64 + 1));
    }
    builder.raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypairs_are_deterministic_and_distinct() {
        assert_eq!(keypair(ALICE, 1).to_seed(), keypair(ALICE, 1).to_seed());
        assert_ne!(keypair(ALICE, 1).public_key(), keypair(ALICE, 2).public_key());
        assert_ne!(keypair(ALICE, 1).public_key(), keypair(BOB, 1).public_key());
    }

    #[test]
    fn test_user_chain_length() {
        assert_eq!(user_chain(5).len(), 5);
    }
}
