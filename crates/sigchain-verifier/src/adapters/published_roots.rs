//! In-memory set of published merkle roots.

use std::collections::BTreeMap;

use crate::domain::MerkleRoot;
use crate::ports::RootPublicationOracle;

/// Merkle roots known to have been published, keyed by root seqno.
///
/// A root counts as published only if both its hash and ctime match the
/// record held for its seqno.
#[derive(Clone, Debug, Default)]
pub struct PublishedRoots {
    roots: BTreeMap<u64, MerkleRoot>,
}

impl PublishedRoots {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a published root. Replaces any root held for the same seqno.
    pub fn publish(&mut self, root: MerkleRoot) -> &mut Self {
        self.roots.insert(root.seqno, root);
        self
    }

    /// Latest published root.
    pub fn latest(&self) -> Option<&MerkleRoot> {
        self.roots.values().next_back()
    }

    /// Number of published roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl FromIterator<MerkleRoot> for PublishedRoots {
    fn from_iter<I: IntoIterator<Item = MerkleRoot>>(iter: I) -> Self {
        let mut roots = Self::new();
        for root in iter {
            roots.publish(root);
        }
        roots
    }
}

impl RootPublicationOracle for PublishedRoots {
    fn is_published(&self, root: &MerkleRoot) -> bool {
        self.roots.get(&root.seqno) == Some(root)
    }
}
