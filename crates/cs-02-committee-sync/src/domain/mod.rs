//! Domain layer for Committee Sync
//!
//! Pure logic: digest construction, roster rules, approval counting, the
//! threshold policy and the transition functions. No I/O, no locks.

pub mod counter;
pub mod digest;
pub mod entities;
pub mod roster;
pub mod state;
pub mod threshold;
pub mod transition;

pub use counter::count_approvals;
pub use digest::DigestBuilder;
pub use entities::{ApprovalTally, SyncOutcome, SyncStep};
pub use roster::{validate_committee, MAX_COMMITTEE_SIZE, MIN_COMMITTEE_SIZE};
pub use state::CommitteeState;
pub use threshold::{required_approvals, DEFAULT_THRESHOLD_BPS};
pub use transition::{apply_batch, apply_init, apply_sync, TransitionContext};
