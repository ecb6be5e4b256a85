//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports and the JSON batch
//! input format.

mod batch;
mod decryptor;
mod key_directory;
mod published_roots;

pub use batch::{BatchError, LinkBatch, LinkRecord, SignerRecord};
pub use decryptor::Keyring;
pub use key_directory::KeyDirectory;
pub use published_roots::PublishedRoots;
