//! # Outbound Ports (Driven Ports / SPI)
//!
//! Host services the sync engine depends on. All synchronous: a transition
//! is short and holds the state lock for its whole duration.

use crate::domain::state::CommitteeState;
use crate::error::SyncResult;
use crate::events::CommitteeEvent;
use shared_types::Timestamp;

/// Durable home of the committee state.
pub trait StateStore: Send + Sync {
    /// Last persisted state, or `None` if nothing was ever stored.
    fn load(&self) -> SyncResult<Option<CommitteeState>>;

    /// Persist a staged state. Called before the state becomes visible;
    /// a failure aborts the transition.
    fn persist(&self, state: &CommitteeState) -> SyncResult<()>;
}

/// Receives events for committed transitions.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: CommitteeEvent);
}

/// Wall-clock source for the `updated` stamp.
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}
