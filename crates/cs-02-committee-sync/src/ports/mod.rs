//! Ports layer: the API this subsystem offers and the host services it needs.

pub mod inbound;
pub mod outbound;

pub use inbound::CommitteeSyncApi;
pub use outbound::{EventSink, StateStore, TimeSource};
