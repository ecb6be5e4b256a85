//! Outer/inner link records and the nested structures they carry.

use super::reader::Fields;
use super::{
    Reader, Writer, CLIENT_INFO, ENCRYPTION_PARAMETERS, INNER_LINK_LAYOUTS, INNER_LINK_V3,
    MERKLE_ROOT, OUTER_LINK_LAYOUTS, OUTER_LINK_V3, TAIL,
};
use crate::domain::{
    ChainType, ClientInfo, CodecError, EncryptionParameters, InnerLink, KeyGeneration, LinkId,
    LinkType, MerkleRoot, OuterLink, PrincipalId, Seqno, Tail,
};

/// Encode an outer link.
pub fn encode_outer_link(link: &OuterLink) -> Result<Vec<u8>, CodecError> {
    write_outer(link, true)
}

/// Encoding hashed to produce `curr`: the outer link with the `curr` slot
/// written as nil.
pub fn outer_canonical_preimage(link: &OuterLink) -> Result<Vec<u8>, CodecError> {
    write_outer(link, false)
}

/// Decode an outer link. Only the canonical encoding is accepted.
pub fn decode_outer_link(bytes: &[u8]) -> Result<OuterLink, CodecError> {
    let mut reader = Reader::new(bytes);
    let link = read_outer(&mut reader)?;
    reader.finish()?;
    ensure_canonical(&encode_outer_link(&link)?, bytes)?;
    Ok(link)
}

/// Encode an inner link.
pub fn encode_inner_link(link: &InnerLink) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();
    if link.version != INNER_LINK_V3.version.unwrap_or_default() {
        return Err(CodecError::UnknownVersion {
            record: INNER_LINK_V3.record,
            version: link.version,
        });
    }
    w.open(&INNER_LINK_V3)?;
    w.uint(link.version)?;
    w.bin(link.signer.as_bytes())?;
    w.uint(link.signing_key_seqno.0)?;
    w.uint(link.ctime)?;
    w.bin(&link.entropy)?;
    match &link.merkle_root {
        Some(root) => write_merkle_root(&mut w, root)?,
        None => w.nil()?,
    }
    match &link.client {
        Some(client) => write_client_info(&mut w, client)?,
        None => w.nil()?,
    }
    match &link.parent_chain {
        Some(tail) => write_tail(&mut w, tail)?,
        None => w.nil()?,
    }
    w.bin(&link.body)?;
    Ok(w.into_bytes())
}

/// Decode an inner link. Only the canonical encoding is accepted.
pub fn decode_inner_link(bytes: &[u8]) -> Result<InnerLink, CodecError> {
    let mut reader = Reader::new(bytes);
    let link = read_inner(&mut reader)?;
    reader.finish()?;
    ensure_canonical(&encode_inner_link(&link)?, bytes)?;
    Ok(link)
}

pub(crate) fn ensure_canonical(reencoded: &[u8], original: &[u8]) -> Result<(), CodecError> {
    if reencoded == original {
        Ok(())
    } else {
        Err(CodecError::NonCanonical)
    }
}

fn write_outer(link: &OuterLink, with_curr: bool) -> Result<Vec<u8>, CodecError> {
    if link.version != OUTER_LINK_V3.version.unwrap_or_default() {
        return Err(CodecError::UnknownVersion {
            record: OUTER_LINK_V3.record,
            version: link.version,
        });
    }
    let mut w = Writer::new();
    w.open(&OUTER_LINK_V3)?;
    w.uint(link.version)?;
    w.uint(link.seqno.0)?;
    match &link.prev {
        Some(prev) => w.bin(prev.as_bytes())?,
        None => w.nil()?,
    }
    if with_curr {
        w.bin(link.curr.as_bytes())?;
    } else {
        w.nil()?;
    }
    w.bin(link.inner.as_bytes())?;
    if !link.link_type.is_canonical() {
        return Err(non_canonical_tag(link.link_type.as_u64()));
    }
    if !link.chain_type.is_canonical() {
        return Err(non_canonical_tag(link.chain_type.as_u64()));
    }
    w.uint(link.link_type.as_u64())?;
    w.uint(link.chain_type.as_u64())?;
    w.bool(link.ignore_if_unsupported)?;
    match &link.encryption_parameters {
        Some(params) => write_encryption_parameters(&mut w, params)?,
        None => w.nil()?,
    }
    Ok(w.into_bytes())
}

fn read_outer(r: &mut Reader<'_>) -> Result<OuterLink, CodecError> {
    let (version, mut f) = r.open_versioned(OUTER_LINK_LAYOUTS)?;
    let seqno = Seqno(r.uint(f.next())?);
    let prev = read_optional_link_id(r, &mut f)?;
    let curr = LinkId(r.bin_fixed(f.next())?);
    let inner = LinkId(r.bin_fixed(f.next())?);
    let link_type = LinkType::from_u64(r.uint(f.next())?);
    let chain_type = ChainType::from_u64(r.uint(f.next())?);
    let ignore_if_unsupported = r.bool(f.next())?;
    f.next();
    let encryption_parameters = if r.take_nil() {
        None
    } else {
        Some(read_encryption_parameters(r)?)
    };

    Ok(OuterLink {
        version,
        seqno,
        prev,
        curr,
        inner,
        link_type,
        chain_type,
        ignore_if_unsupported,
        encryption_parameters,
    })
}

fn read_inner(r: &mut Reader<'_>) -> Result<InnerLink, CodecError> {
    let (version, mut f) = r.open_versioned(INNER_LINK_LAYOUTS)?;
    let signer = PrincipalId(r.bin_fixed(f.next())?);
    let signing_key_seqno = KeyGeneration(r.uint(f.next())?);
    let ctime = r.uint(f.next())?;
    let entropy = r.bin(f.next())?.to_vec();
    f.next();
    let merkle_root = if r.take_nil() {
        None
    } else {
        Some(read_merkle_root(r)?)
    };
    f.next();
    let client = if r.take_nil() {
        None
    } else {
        Some(read_client_info(r)?)
    };
    f.next();
    let parent_chain = if r.take_nil() {
        None
    } else {
        Some(read_tail(r)?)
    };
    let body = r.bin(f.next())?.to_vec();

    Ok(InnerLink {
        version,
        signer,
        signing_key_seqno,
        ctime,
        entropy,
        merkle_root,
        client,
        parent_chain,
        body,
    })
}

fn read_optional_link_id(r: &mut Reader<'_>, f: &mut Fields) -> Result<Option<LinkId>, CodecError> {
    let field = f.next();
    if r.take_nil() {
        Ok(None)
    } else {
        Ok(Some(LinkId(r.bin_fixed(field)?)))
    }
}

fn write_merkle_root(w: &mut Writer, root: &MerkleRoot) -> Result<(), CodecError> {
    w.open(&MERKLE_ROOT)?;
    w.bin(&root.hash)?;
    w.uint(root.seqno)?;
    w.uint(root.ctime)
}

fn read_merkle_root(r: &mut Reader<'_>) -> Result<MerkleRoot, CodecError> {
    let mut f = r.open(&MERKLE_ROOT)?;
    Ok(MerkleRoot {
        hash: r.bin(f.next())?.to_vec(),
        seqno: r.uint(f.next())?,
        ctime: r.uint(f.next())?,
    })
}

fn write_client_info(w: &mut Writer, client: &ClientInfo) -> Result<(), CodecError> {
    w.open(&CLIENT_INFO)?;
    w.str(&client.desc)?;
    w.str(&client.version)
}

fn read_client_info(r: &mut Reader<'_>) -> Result<ClientInfo, CodecError> {
    let mut f = r.open(&CLIENT_INFO)?;
    Ok(ClientInfo {
        desc: r.str(f.next())?.to_string(),
        version: r.str(f.next())?.to_string(),
    })
}

fn write_encryption_parameters(
    w: &mut Writer,
    params: &EncryptionParameters,
) -> Result<(), CodecError> {
    w.open(&ENCRYPTION_PARAMETERS)?;
    w.uint(u64::from(params.version))?;
    w.bin(&params.kid)?;
    w.bin(&params.nonce)
}

fn read_encryption_parameters(r: &mut Reader<'_>) -> Result<EncryptionParameters, CodecError> {
    let mut f = r.open(&ENCRYPTION_PARAMETERS)?;
    let field = f.next();
    let version = u32::try_from(r.uint(field)?).map_err(|_| CodecError::InvalidValue {
        field,
        detail: "version exceeds u32".to_string(),
    })?;
    Ok(EncryptionParameters {
        version,
        kid: r.bin(f.next())?.to_vec(),
        nonce: r.bin(f.next())?.to_vec(),
    })
}

fn non_canonical_tag(tag: u64) -> CodecError {
    CodecError::Encode(format!("Unknown type tag {} shadows an assigned tag", tag))
}

fn write_tail(w: &mut Writer, tail: &Tail) -> Result<(), CodecError> {
    if !tail.chain_type.is_canonical() {
        return Err(non_canonical_tag(tail.chain_type.as_u64()));
    }
    w.open(&TAIL)?;
    w.uint(tail.chain_type.as_u64())?;
    w.uint(tail.seqno.0)?;
    w.bin(tail.hash.as_bytes())
}

fn read_tail(r: &mut Reader<'_>) -> Result<Tail, CodecError> {
    let mut f = r.open(&TAIL)?;
    Ok(Tail {
        chain_type: ChainType::from_u64(r.uint(f.next())?),
        seqno: Seqno(r.uint(f.next())?),
        hash: LinkId(r.bin_fixed(f.next())?),
    })
}
