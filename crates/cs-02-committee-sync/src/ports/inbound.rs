//! # Inbound Ports (Driving Ports / API)
//!
//! What a host can ask of a committee sync replica.

use crate::domain::entities::{SyncOutcome, SyncStep};
use crate::domain::state::CommitteeState;
use crate::error::SyncResult;
use shared_types::{Address, ConfigEntry, ConfigRecord, Hash, Nonce, Timestamp};

/// Committee sync API.
///
/// Mutating calls are all-or-nothing: on `Err` the committee, nonce, config
/// and `updated` are exactly what they were before the call.
pub trait CommitteeSyncApi: Send + Sync {
    /// Apply one signed transition, approved by the current committee.
    fn sync(&self, step: SyncStep) -> SyncResult<SyncOutcome>;

    /// Apply transitions in order, all or nothing. Step k+1 must be
    /// approved by the committee step k installs.
    fn syncs(&self, steps: Vec<SyncStep>) -> SyncResult<Vec<SyncOutcome>>;

    /// Bootstrap nonce jump. Only while the committee is the single seed
    /// member, only by that member, only forward.
    fn init(&self, caller: Address, nonce: Nonce) -> SyncResult<Nonce>;

    /// Digest a proposal would need to be signed over at `nonce`.
    fn hash(&self, nonce: Nonce, committee: &[Address], config: &[ConfigEntry]) -> Hash;

    fn committee(&self) -> Vec<Address>;

    fn is_member(&self, id: &Address) -> bool;

    /// Position of `id` in the current committee.
    fn index_of(&self, id: &Address) -> Option<usize>;

    /// Stored configuration for `account`; a never-set account reads as
    /// version 0 with an empty value.
    fn config(&self, account: &Address) -> ConfigRecord;

    fn nonce(&self) -> Nonce;

    /// Timestamp of the last committed sync (0 if none).
    fn updated(&self) -> Timestamp;

    /// Consistent copy of the whole state.
    fn snapshot(&self) -> CommitteeState;
}
