//! # Body Variant Resolver
//!
//! Maps a link type to its legal chain types and body layout, and decodes
//! inner-link bodies into [`BodyVariant`].
//!
//! ## Body layouts
//!
//! | Link type | Layout |
//! |-----------|--------|
//! | passive follow, secret summary | `[[principal, seqno], ...]`, principals strictly increasing |
//! | unfollow | `[principal, ...]`, strictly increasing |
//! | per-user key, per-team key | `[generation, encryption_kid, signing_kid]`, generation >= 1 |
//! | team root | `[team, [[principal, role], ...]]`, members strictly increasing |
//! | team change membership | `[[[principal, role], ...], [principal, ...]]`, both lists strictly increasing |
//! | team leave | `[]` |

use crate::codec::{Reader, RecordLayout, Writer};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    invariant_strictly_increasing, legal_chain_types, BodyError, BodyVariant, ChainType,
    CodecError, FollowMap, KeyGeneration, KeyRotation, Kid, LinkType, MembershipChange,
    PrincipalId, Seqno, TeamRole, TeamRoot,
};

const FOLLOW_ENTRY: RecordLayout = RecordLayout {
    record: "follow_entry",
    version: None,
    fields: &["principal", "seqno"],
};

const KEY_ROTATION: RecordLayout = RecordLayout {
    record: "key_rotation",
    version: None,
    fields: &["generation", "encryption_kid", "signing_kid"],
};

const MEMBERSHIP_CHANGE: RecordLayout = RecordLayout {
    record: "membership_change",
    version: None,
    fields: &["add", "remove"],
};

const MEMBER_ENTRY: RecordLayout = RecordLayout {
    record: "member_entry",
    version: None,
    fields: &["principal", "role"],
};

const TEAM_ROOT: RecordLayout = RecordLayout {
    record: "team_root",
    version: None,
    fields: &["team", "members"],
};

const TEAM_LEAVE: RecordLayout = RecordLayout {
    record: "team_leave",
    version: None,
    fields: &[],
};

/// Check that a link type is known and legal on the chain type.
///
/// # Errors
///
/// - `UnsupportedLinkType`: unknown tag (the caller decides skip vs. fail)
/// - `InvalidChainTypeForLink`: known tag on the wrong chain (always fatal)
pub fn classify_link(link_type: LinkType, chain_type: ChainType) -> Result<LinkType, BodyError> {
    if !link_type.is_known() {
        return Err(BodyError::UnsupportedLinkType(link_type));
    }
    if !legal_chain_types(link_type).contains(&chain_type) {
        return Err(BodyError::InvalidChainTypeForLink {
            link_type,
            chain_type,
        });
    }
    Ok(link_type)
}

/// Decode a body for a link type on a chain type.
pub fn decode_body(
    link_type: LinkType,
    chain_type: ChainType,
    raw: &[u8],
) -> Result<BodyVariant, BodyError> {
    let link_type = classify_link(link_type, chain_type)?;
    decode_known(link_type, raw).map_err(BodyError::Malformed)
}

/// Encode a body. `Unrecognized` bodies are returned as carried.
pub fn encode_body(body: &BodyVariant) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();
    match body {
        BodyVariant::PassiveFollow(follows) | BodyVariant::SecretSummary(follows) => {
            write_follow_map(&mut w, follows)?
        }
        BodyVariant::PerUserKey(rotation) | BodyVariant::TeamPtk(rotation) => {
            write_key_rotation(&mut w, rotation)?
        }
        BodyVariant::Unfollow(principals) => write_principals(&mut w, principals)?,
        BodyVariant::TeamRoot(root) => {
            w.open(&TEAM_ROOT)?;
            w.bin(root.team.as_bytes())?;
            write_members(&mut w, &root.members)?
        }
        BodyVariant::TeamChangeMembership(change) => write_membership(&mut w, change)?,
        BodyVariant::TeamLeave => w.open(&TEAM_LEAVE)?,
        BodyVariant::Unrecognized { raw, .. } => return Ok(raw.clone()),
    }
    Ok(w.into_bytes())
}

fn decode_known(link_type: LinkType, raw: &[u8]) -> Result<BodyVariant, CodecError> {
    let mut r = Reader::new(raw);
    let body = match link_type {
        LinkType::PassiveFollow => BodyVariant::PassiveFollow(read_follow_map(&mut r)?),
        LinkType::SecretSummary => BodyVariant::SecretSummary(read_follow_map(&mut r)?),
        LinkType::PerUserKey => BodyVariant::PerUserKey(read_key_rotation(&mut r)?),
        LinkType::Unfollow => BodyVariant::Unfollow(read_principals(&mut r, "unfollow")?),
        LinkType::TeamRoot => {
            let mut f = r.open(&TEAM_ROOT)?;
            let team = PrincipalId(r.bin_fixed(f.next())?);
            let members = read_members(&mut r, f.next())?;
            BodyVariant::TeamRoot(TeamRoot { team, members })
        }
        LinkType::TeamPtk => BodyVariant::TeamPtk(read_key_rotation(&mut r)?),
        LinkType::TeamChangeMembership => {
            BodyVariant::TeamChangeMembership(read_membership(&mut r)?)
        }
        LinkType::TeamLeave => {
            r.open(&TEAM_LEAVE)?;
            BodyVariant::TeamLeave
        }
        LinkType::Unknown(tag) => {
            return Err(CodecError::InvalidValue {
                field: "type",
                detail: format!("no body layout for tag {}", tag),
            })
        }
    };
    r.finish()?;

    let reencoded = encode_body(&body)?;
    if reencoded != raw {
        return Err(CodecError::NonCanonical);
    }
    Ok(body)
}

fn read_follow_map(r: &mut Reader<'_>) -> Result<FollowMap, CodecError> {
    let count = r.array_len("follows")?;
    let mut entries = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let mut f = r.open(&FOLLOW_ENTRY)?;
        let principal = PrincipalId(r.bin_fixed(f.next())?);
        let field = f.next();
        let seqno = r.uint(field)?;
        if seqno == 0 {
            return Err(CodecError::InvalidValue {
                field,
                detail: "follow pin must be a chain position".to_string(),
            });
        }
        entries.push((principal, Seqno(seqno)));
    }

    let keys: Vec<PrincipalId> = entries.iter().map(|(principal, _)| *principal).collect();
    if !invariant_strictly_increasing(&keys) {
        return Err(CodecError::NonCanonical);
    }
    Ok(entries.into_iter().collect())
}

fn write_follow_map(w: &mut Writer, follows: &FollowMap) -> Result<(), CodecError> {
    w.array_len(follows.len())?;
    for (principal, seqno) in follows {
        w.open(&FOLLOW_ENTRY)?;
        w.bin(principal.as_bytes())?;
        w.uint(seqno.0)?;
    }
    Ok(())
}

fn read_key_rotation(r: &mut Reader<'_>) -> Result<KeyRotation, CodecError> {
    let mut f = r.open(&KEY_ROTATION)?;
    let field = f.next();
    let generation = r.uint(field)?;
    if generation == 0 {
        return Err(CodecError::InvalidValue {
            field,
            detail: "generation starts at 1".to_string(),
        });
    }
    Ok(KeyRotation {
        generation: KeyGeneration(generation),
        encryption_kid: Kid(r.bin_fixed(f.next())?),
        signing_kid: Kid(r.bin_fixed(f.next())?),
    })
}

fn write_key_rotation(w: &mut Writer, rotation: &KeyRotation) -> Result<(), CodecError> {
    w.open(&KEY_ROTATION)?;
    w.uint(rotation.generation.0)?;
    w.bin(&rotation.encryption_kid.0)?;
    w.bin(&rotation.signing_kid.0)
}

fn read_members(
    r: &mut Reader<'_>,
    field: &'static str,
) -> Result<BTreeMap<PrincipalId, TeamRole>, CodecError> {
    let count = r.array_len(field)?;
    let mut members = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let mut entry = r.open(&MEMBER_ENTRY)?;
        let principal = PrincipalId(r.bin_fixed(entry.next())?);
        let field = entry.next();
        let tag = r.uint(field)?;
        let role = TeamRole::from_u64(tag).ok_or_else(|| CodecError::InvalidValue {
            field,
            detail: format!("unknown role {}", tag),
        })?;
        members.push((principal, role));
    }

    let keys: Vec<PrincipalId> = members.iter().map(|(principal, _)| *principal).collect();
    if !invariant_strictly_increasing(&keys) {
        return Err(CodecError::NonCanonical);
    }
    Ok(members.into_iter().collect())
}

fn write_members(
    w: &mut Writer,
    members: &BTreeMap<PrincipalId, TeamRole>,
) -> Result<(), CodecError> {
    w.array_len(members.len())?;
    for (principal, role) in members {
        w.open(&MEMBER_ENTRY)?;
        w.bin(principal.as_bytes())?;
        w.uint(role.as_u64())?;
    }
    Ok(())
}

fn read_principals(
    r: &mut Reader<'_>,
    field: &'static str,
) -> Result<BTreeSet<PrincipalId>, CodecError> {
    let count = r.array_len(field)?;
    let mut principals = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        principals.push(PrincipalId(r.bin_fixed(field)?));
    }
    if !invariant_strictly_increasing(&principals) {
        return Err(CodecError::NonCanonical);
    }
    Ok(principals.into_iter().collect())
}

fn write_principals(w: &mut Writer, principals: &BTreeSet<PrincipalId>) -> Result<(), CodecError> {
    w.array_len(principals.len())?;
    for principal in principals {
        w.bin(principal.as_bytes())?;
    }
    Ok(())
}

fn read_membership(r: &mut Reader<'_>) -> Result<MembershipChange, CodecError> {
    let mut f = r.open(&MEMBERSHIP_CHANGE)?;
    let add = read_members(r, f.next())?;
    let remove = read_principals(r, f.next())?;
    Ok(MembershipChange { add, remove })
}

fn write_membership(w: &mut Writer, change: &MembershipChange) -> Result<(), CodecError> {
    w.open(&MEMBERSHIP_CHANGE)?;
    write_members(w, &change.add)?;
    write_principals(w, &change.remove)
}
