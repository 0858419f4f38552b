//! # Committee Events
//!
//! Emitted through the `EventSink` port only after a transition has been
//! persisted and published. A rejected call emits nothing.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Address, Hash, Nonce};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommitteeEvent {
    /// A signed transition installed a new committee.
    RosterChanged {
        nonce: Nonce,
        #[serde_as(as = "Vec<Hex>")]
        committee: Vec<Address>,
        /// Distinct approvals that carried the transition
        count: usize,
        #[serde_as(as = "Hex")]
        digest: Hash,
    },

    /// The seed member moved the nonce forward.
    NonceInitialized { nonce: Nonce },
}

impl CommitteeEvent {
    /// Nonce the event leaves the state at.
    pub fn nonce(&self) -> Nonce {
        match self {
            CommitteeEvent::RosterChanged { nonce, .. } => *nonce,
            CommitteeEvent::NonceInitialized { nonce } => *nonce,
        }
    }
}
