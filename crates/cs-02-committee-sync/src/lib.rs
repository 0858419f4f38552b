//! # Committee Sync Subsystem (CS-02)
//!
//! Maintains the authoritative committee of identities that approves state
//! transitions, plus a per-account configuration table. The current committee
//! authorizes its own successor by signing a digest bound to the next nonce.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): digest, roster rules, approval counting,
//!   threshold policy, transition functions
//! - **Ports Layer** (`ports/`): `CommitteeSyncApi` inbound; `StateStore`,
//!   `EventSink`, `TimeSource` outbound
//! - **Adapters** (`adapters/`): in-memory and JSON-file stores, broadcast
//!   event sink, clocks
//! - **Service Layer** (`service.rs`): `CommitteeSyncService`, the staged
//!   commit around the domain
//!
//! ## Guarantees
//!
//! - The nonce advances by exactly one per applied sync, so every approval is
//!   single-use.
//! - A failed `sync`, `syncs` or `init` changes nothing and emits nothing.
//! - Approvals are checked against the committee *before* the update; the
//!   outgoing committee authorizes its successor.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    BroadcastEventSink, FixedTimeSource, InMemoryStateStore, JsonFileStateStore, NoopEventSink,
    SystemTimeSource,
};
pub use config::SyncConfig;
pub use domain::{
    ApprovalTally, CommitteeState, DigestBuilder, SyncOutcome, SyncStep, DEFAULT_THRESHOLD_BPS,
    MAX_COMMITTEE_SIZE, MIN_COMMITTEE_SIZE,
};
pub use error::{CommitteeViolation, InitViolation, SyncError, SyncResult};
pub use events::CommitteeEvent;
pub use ports::{CommitteeSyncApi, EventSink, StateStore, TimeSource};
pub use service::CommitteeSyncService;
