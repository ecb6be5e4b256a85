//! # Application Module
//!
//! The chain verifier service and the link producer.

pub mod producer;
pub mod service;

pub use producer::{seal_link, LinkDraft, LinkProducer, SealedLink};
pub use service::ChainVerifier;
