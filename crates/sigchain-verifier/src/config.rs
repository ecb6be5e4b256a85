//! # Verifier Configuration
//!
//! Knobs for the chain verifier. All of them tighten or loosen checks on
//! otherwise well-formed links; none changes the wire format.

use serde::{Deserialize, Serialize};

use crate::domain::{ChainType, DEFAULT_MAX_ANCHOR_SKEW_SECS, DEFAULT_MAX_LINK_BYTES};

/// Chain verifier configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Chain type every chain must have. `None` accepts the type of the
    /// first link and pins it from there.
    pub expected_chain_type: Option<ChainType>,

    /// Reject links without a merkle anchor.
    pub require_merkle_anchor: bool,

    /// How far (seconds) an anchor's ctime may run ahead of the link ctime.
    pub max_anchor_skew_secs: u64,

    /// Size limit for each of the outer and inner encodings of a link.
    pub max_link_bytes: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            expected_chain_type: None,
            require_merkle_anchor: false,
            max_anchor_skew_secs: DEFAULT_MAX_ANCHOR_SKEW_SECS,
            max_link_bytes: DEFAULT_MAX_LINK_BYTES,
        }
    }
}

impl VerifierConfig {
    /// Create a config for testing (small limits, no skew tolerance).
    pub fn for_testing() -> Self {
        Self {
            expected_chain_type: None,
            require_merkle_anchor: false,
            max_anchor_skew_secs: 0,
            max_link_bytes: 64 * 1024,
        }
    }

    /// Pin every chain to one chain type.
    pub fn with_expected_chain_type(mut self, chain_type: ChainType) -> Self {
        self.expected_chain_type = Some(chain_type);
        self
    }

    /// Require a merkle anchor on every accepted link.
    pub fn with_required_anchor(mut self) -> Self {
        self.require_merkle_anchor = true;
        self
    }
}
