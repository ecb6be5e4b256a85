//! # Fold Rules
//!
//! Pure transitions from one chain state to the next. Every function here
//! takes the prior snapshot by reference and returns a new one; the prior
//! snapshot is never touched.
//!
//! | Body | Rule |
//! |------|------|
//! | passive follow | merge pins into `follows`, later pins overwrite |
//! | secret summary | replace `secret_summaries` wholesale |
//! | unfollow | every principal must be followed; drop them from `follows` |
//! | per-user key / per-team key | generation must be exactly previous + 1, starting at 1 |
//! | team root | first link of a team chain only; seeds the member list |
//! | team change membership | removals must be members, no principal both added and removed |
//! | team leave | signer must be a member; removes the signer |
//! | unrecognized | view unchanged, link recorded as skipped |
//!
//! The first link opens the chain: a user chain belongs to its first
//! signer, a team chain to the team its root names. Only a known link can
//! open a chain.

use std::collections::BTreeMap;

use crate::domain::{
    invariant_generation_successor, ApplyError, BodyVariant, ChainState, ChainType, ChainView,
    InnerLink, KeyGeneration, OuterLink, PrincipalId, SkippedLink,
};

/// Apply a decoded body, signed by `signer`, to a view.
pub fn apply_body(
    view: &ChainView,
    chain_type: ChainType,
    signer: PrincipalId,
    body: &BodyVariant,
) -> Result<ChainView, ApplyError> {
    match (view, body) {
        (_, BodyVariant::Unrecognized { .. }) => Ok(view.clone()),

        (ChainView::User(user), BodyVariant::PassiveFollow(follows)) => {
            let mut user = user.clone();
            user.follows
                .extend(follows.iter().map(|(principal, seqno)| (*principal, *seqno)));
            Ok(ChainView::User(user))
        }

        (ChainView::User(user), BodyVariant::SecretSummary(summary)) => {
            let mut user = user.clone();
            user.secret_summaries = summary.clone();
            Ok(ChainView::User(user))
        }

        (ChainView::User(user), BodyVariant::Unfollow(principals)) => {
            if let Some(principal) = principals.iter().find(|p| !user.follows.contains_key(p)) {
                return Err(ApplyError::NotFollowed(*principal));
            }
            let mut user = user.clone();
            user.follows.retain(|principal, _| !principals.contains(principal));
            Ok(ChainView::User(user))
        }

        (ChainView::User(user), BodyVariant::PerUserKey(rotation)) => {
            let current = user.per_user_key.map(|key| key.generation);
            check_generation(current, rotation.generation)?;
            let mut user = user.clone();
            user.per_user_key = Some(*rotation);
            Ok(ChainView::User(user))
        }

        (ChainView::Team(team), BodyVariant::TeamRoot(root)) => {
            if !team.members.is_empty() || !team.per_team_keys.is_empty() {
                return Err(ApplyError::RootNotFirst);
            }
            let mut team = team.clone();
            team.members = root.members.clone();
            Ok(ChainView::Team(team))
        }

        (ChainView::Team(team), BodyVariant::TeamPtk(rotation)) => {
            check_generation(team.current_generation(), rotation.generation)?;
            let mut team = team.clone();
            team.per_team_keys.insert(rotation.generation, *rotation);
            Ok(ChainView::Team(team))
        }

        (ChainView::Team(team), BodyVariant::TeamChangeMembership(change)) => {
            if let Some(principal) = change.add.keys().find(|p| change.remove.contains(p)) {
                return Err(ApplyError::AddAndRemove(*principal));
            }
            if let Some(principal) = change.remove.iter().find(|p| !team.members.contains_key(p)) {
                return Err(ApplyError::NotAMember(*principal));
            }

            let mut members: BTreeMap<_, _> = team
                .members
                .iter()
                .filter(|(principal, _)| !change.remove.contains(principal))
                .map(|(principal, role)| (*principal, *role))
                .collect();
            members.extend(change.add.iter().map(|(principal, role)| (*principal, *role)));

            let mut team = team.clone();
            team.members = members;
            Ok(ChainView::Team(team))
        }

        (ChainView::Team(team), BodyVariant::TeamLeave) => {
            if !team.members.contains_key(&signer) {
                return Err(ApplyError::NotAMember(signer));
            }
            let mut team = team.clone();
            team.members.remove(&signer);
            Ok(ChainView::Team(team))
        }

        (_, body) => Err(ApplyError::ViewMismatch {
            link_type: body.link_type(),
            chain_type,
        }),
    }
}

/// State after skipping an unsupported link: bookkeeping advances, the
/// view does not. There is always a prior state; a chain never opens with
/// a skipped link.
pub fn skip_link(prior: &ChainState, outer: OuterLink) -> ChainState {
    let mut next = prior.clone();
    next.skipped.push(SkippedLink {
        seqno: outer.seqno,
        link_type: outer.link_type,
    });
    next.last_link = outer;
    next
}

/// State after accepting a fully verified link.
///
/// # Errors
///
/// - `MissingTeamRoot`: a team chain opened by anything but a root
/// - `RootNotFirst`: a root on an already open chain
/// - any error of [`apply_body`]
pub fn accept_link(
    prior: Option<&ChainState>,
    outer: OuterLink,
    inner: &InnerLink,
    body: &BodyVariant,
) -> Result<ChainState, ApplyError> {
    let mut next = match prior {
        Some(_) if matches!(body, BodyVariant::TeamRoot(_)) => {
            return Err(ApplyError::RootNotFirst)
        }
        Some(state) => state.clone(),
        None => open_chain(&outer, inner, body)?,
    };
    next.view = apply_body(&next.view, next.chain_type, inner.signer, body)?;
    next.last_ctime = Some(inner.ctime);
    if let Some(root) = &inner.merkle_root {
        next.last_anchor = Some(root.clone());
    }
    if let Some(tail) = &inner.parent_chain {
        next.parent_tail = Some(tail.clone());
    }
    let generation = next
        .signer_generations
        .entry(inner.signer)
        .or_insert(inner.signing_key_seqno);
    if *generation < inner.signing_key_seqno {
        *generation = inner.signing_key_seqno;
    }
    next.last_link = outer;
    Ok(next)
}

fn open_chain(
    outer: &OuterLink,
    inner: &InnerLink,
    body: &BodyVariant,
) -> Result<ChainState, ApplyError> {
    let view = ChainView::empty_for(outer.chain_type).ok_or(ApplyError::ViewMismatch {
        link_type: outer.link_type,
        chain_type: outer.chain_type,
    })?;
    let owner = match (outer.chain_type, body) {
        (ChainType::TeamPrivate, BodyVariant::TeamRoot(root)) => root.team,
        (ChainType::TeamPrivate, other) => {
            return Err(ApplyError::MissingTeamRoot(other.link_type()))
        }
        _ => inner.signer,
    };
    Ok(ChainState {
        chain_type: outer.chain_type,
        owner,
        last_link: outer.clone(),
        last_ctime: None,
        last_anchor: None,
        parent_tail: None,
        signer_generations: BTreeMap::new(),
        skipped: Vec::new(),
        view,
    })
}

fn check_generation(current: Option<KeyGeneration>, next: KeyGeneration) -> Result<(), ApplyError> {
    if invariant_generation_successor(current, next) {
        return Ok(());
    }
    let expected = current
        .and_then(|generation| generation.next())
        .unwrap_or(KeyGeneration::FIRST);
    Err(ApplyError::GenerationGap {
        expected,
        actual: next,
    })
}
