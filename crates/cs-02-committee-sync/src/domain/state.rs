//! Committee state
//!
//! The only mutable resource in the subsystem: roster, nonce, last-update
//! timestamp and per-account configuration. Mutated exclusively by the
//! transition engine (`domain::transition`); everything else reads it.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Address, ConfigEntry, ConfigRecord, Nonce, Timestamp};
use std::collections::BTreeMap;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeState {
    #[serde_as(as = "Vec<Hex>")]
    committee: Vec<Address>,
    nonce: Nonce,
    updated: Timestamp,
    #[serde_as(as = "Vec<(Hex, _)>")]
    #[serde(default)]
    config: BTreeMap<Address, ConfigRecord>,
}

impl CommitteeState {
    /// Fresh state: a single seed member at nonce 0, never updated.
    pub fn genesis(seed: Address) -> Self {
        Self {
            committee: vec![seed],
            nonce: 0,
            updated: 0,
            config: BTreeMap::new(),
        }
    }

    pub fn committee(&self) -> &[Address] {
        &self.committee
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    /// Timestamp of the last committed transition (0 if none).
    pub fn updated(&self) -> Timestamp {
        self.updated
    }

    /// Linear lookup of `id` in the current roster.
    pub fn index_of(&self, id: &Address) -> Option<usize> {
        self.committee.iter().position(|member| member == id)
    }

    pub fn is_member(&self, id: &Address) -> bool {
        self.index_of(id).is_some()
    }

    /// Stored configuration for `account`, if any transition ever set it.
    pub fn config(&self, account: &Address) -> Option<&ConfigRecord> {
        self.config.get(account)
    }

    /// All stored configuration, ordered by account.
    pub fn configs(&self) -> impl Iterator<Item = (&Address, &ConfigRecord)> {
        self.config.iter()
    }

    pub(crate) fn replace_committee(&mut self, committee: Vec<Address>) {
        self.committee = committee;
    }

    pub(crate) fn set_nonce(&mut self, nonce: Nonce) {
        self.nonce = nonce;
    }

    pub(crate) fn set_updated(&mut self, updated: Timestamp) {
        self.updated = updated;
    }

    /// Overwrite version and value for the entry's account.
    pub(crate) fn apply_config(&mut self, entry: ConfigEntry) {
        let (account, record) = entry.into_record();
        self.config.insert(account, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis() {
        let state = CommitteeState::genesis([0xAA; 20]);
        assert_eq!(state.committee(), &[[0xAA; 20]]);
        assert_eq!(state.nonce(), 0);
        assert_eq!(state.updated(), 0);
        assert_eq!(state.configs().count(), 0);
    }

    #[test]
    fn test_index_of_and_membership() {
        let mut state = CommitteeState::genesis([0xAA; 20]);
        state.replace_committee(vec![[1; 20], [2; 20], [3; 20]]);

        assert_eq!(state.index_of(&[2; 20]), Some(1));
        assert_eq!(state.index_of(&[9; 20]), None);
        assert!(state.is_member(&[3; 20]));
        assert!(!state.is_member(&[0xAA; 20]));
    }

    #[test]
    fn test_apply_config_overwrites_and_clears() {
        let mut state = CommitteeState::genesis([0xAA; 20]);
        state.apply_config(ConfigEntry::new([7; 20], 1, vec![1, 2, 3]));
        state.apply_config(ConfigEntry::new([7; 20], 4, Vec::new()));

        let record = state.config(&[7; 20]).unwrap();
        assert_eq!(record.version, 4);
        assert!(record.is_cleared());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut state = CommitteeState::genesis([0xAA; 20]);
        state.set_nonce(12);
        state.set_updated(1_700_000_000);
        state.apply_config(ConfigEntry::new([7; 20], 2, vec![0xBE, 0xEF]));

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("beef"));
        let decoded: CommitteeState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, state);
    }
}
