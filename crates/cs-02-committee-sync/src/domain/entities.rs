//! Proposal and outcome entities

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Address, ConfigEntry, Hash, Nonce, RawSignature};

/// One proposed transition: the new roster, config updates, and the
/// approvals collected for it. Also the element type of a batch.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStep {
    #[serde_as(as = "Vec<Hex>")]
    pub committee: Vec<Address>,
    #[serde(default)]
    pub config: Vec<ConfigEntry>,
    #[serde_as(as = "Vec<Hex>")]
    #[serde(default)]
    pub signatures: Vec<RawSignature>,
}

impl SyncStep {
    pub fn new(
        committee: Vec<Address>,
        config: Vec<ConfigEntry>,
        signatures: Vec<RawSignature>,
    ) -> Self {
        Self {
            committee,
            config,
            signatures,
        }
    }
}

/// Result of a committed transition.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Nonce consumed by this transition
    pub nonce: Nonce,
    /// Committee installed by this transition
    #[serde_as(as = "Vec<Hex>")]
    pub committee: Vec<Address>,
    /// Digest the approvals were checked against
    #[serde_as(as = "Hex")]
    pub digest: Hash,
    /// Counted and skipped approvals
    pub tally: ApprovalTally,
}

impl SyncOutcome {
    /// Distinct current-member approvals counted.
    pub fn count(&self) -> usize {
        self.tally.count
    }
}

/// What the signature counter saw for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTally {
    /// Distinct current members whose approval recovered against the digest
    pub count: usize,
    /// Malformed or unrecoverable signatures
    pub malformed: usize,
    /// Recovered to an address outside the current committee
    pub non_members: usize,
    /// Repeat approvals from a member already counted
    pub duplicates: usize,
}

impl ApprovalTally {
    /// Total signatures discarded.
    pub fn skipped(&self) -> usize {
        self.malformed + self.non_members + self.duplicates
    }
}
