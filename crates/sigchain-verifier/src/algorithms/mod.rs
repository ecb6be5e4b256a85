//! # Algorithms Module
//!
//! Pure verification steps, applied by the service in pipeline order:
//! link identity, body resolution, signer resolution, anchor checks, fold.

pub mod anchor_checker;
pub mod body_resolver;
pub mod fold;
pub mod link_identity;
pub mod signer_resolver;

pub use anchor_checker::{check_anchor, check_anchor_recency, check_parent_tail, check_publication};
pub use body_resolver::{classify_link, decode_body, encode_body};
pub use fold::{accept_link, apply_body, skip_link};
pub use link_identity::{
    compute_curr, compute_link_id, verify_chain_type, verify_inner_attestation, verify_linkage,
};
pub use signer_resolver::{
    check_authority, check_claim, check_ctime, resolve_signer, verify_link_signature,
};
