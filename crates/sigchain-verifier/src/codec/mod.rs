//! # Binary Link Codec
//!
//! Positional MessagePack records. Every record is a msgpack array whose
//! elements appear in the order of an explicit layout table; versioned
//! records carry their version as the first element and the version picks
//! the layout. Optional fields encode as nil.
//!
//! | Record | Version | Fields |
//! |--------|---------|--------|
//! | `outer_link` | 3 | version, seqno, prev, curr, inner, type, chaintype, ignore_if_unsupported, encryption_parameters |
//! | `inner_link` | 3 | version, signer, signing_key_seqno, ctime, entropy, merkle_root, client, parent_chain, body |
//! | `merkle_root` | - | hash, seqno, ctime |
//! | `client_info` | - | desc, version |
//! | `encryption_parameters` | - | version, kid, nonce |
//! | `tail` | - | chaintype, seqno, hash |
//!
//! Decoders accept only the canonical encoding: minimal-width integers and
//! lengths, exact arity, no trailing bytes.

mod links;
mod reader;
mod writer;

pub use links::{
    decode_inner_link, decode_outer_link, encode_inner_link, encode_outer_link,
    outer_canonical_preimage,
};
pub(crate) use reader::Reader;
pub(crate) use writer::Writer;

/// Field list of one record version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Record name, used in errors.
    pub record: &'static str,
    /// Version this layout belongs to; `None` for unversioned nested records.
    pub version: Option<u64>,
    /// Field names in wire order.
    pub fields: &'static [&'static str],
}

impl RecordLayout {
    /// Number of array elements on the wire.
    pub const fn arity(&self) -> u32 {
        self.fields.len() as u32
    }
}

/// Outer link, version 3.
pub const OUTER_LINK_V3: RecordLayout = RecordLayout {
    record: "outer_link",
    version: Some(3),
    fields: &[
        "version",
        "seqno",
        "prev",
        "curr",
        "inner",
        "type",
        "chaintype",
        "ignore_if_unsupported",
        "encryption_parameters",
    ],
};

/// Inner link, version 3.
pub const INNER_LINK_V3: RecordLayout = RecordLayout {
    record: "inner_link",
    version: Some(3),
    fields: &[
        "version",
        "signer",
        "signing_key_seqno",
        "ctime",
        "entropy",
        "merkle_root",
        "client",
        "parent_chain",
        "body",
    ],
};

/// Merkle root snapshot.
pub const MERKLE_ROOT: RecordLayout = RecordLayout {
    record: "merkle_root",
    version: None,
    fields: &["hash", "seqno", "ctime"],
};

/// Client descriptor.
pub const CLIENT_INFO: RecordLayout = RecordLayout {
    record: "client_info",
    version: None,
    fields: &["desc", "version"],
};

/// Encryption parameters.
pub const ENCRYPTION_PARAMETERS: RecordLayout = RecordLayout {
    record: "encryption_parameters",
    version: None,
    fields: &["version", "kid", "nonce"],
};

/// Tail pointer.
pub const TAIL: RecordLayout = RecordLayout {
    record: "tail",
    version: None,
    fields: &["chaintype", "seqno", "hash"],
};

/// Every outer-link version this verifier understands.
pub const OUTER_LINK_LAYOUTS: &[RecordLayout] = &[OUTER_LINK_V3];

/// Every inner-link version this verifier understands.
pub const INNER_LINK_LAYOUTS: &[RecordLayout] = &[INNER_LINK_V3];

/// Look up the layout for a declared version.
pub fn layout_for(layouts: &'static [RecordLayout], version: u64) -> Option<&'static RecordLayout> {
    layouts.iter().find(|layout| layout.version == Some(version))
}
