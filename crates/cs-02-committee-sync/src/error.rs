//! Error types for the Committee Sync subsystem
//!
//! Four categories:
//! - structural rejection (`InvalidCommittee`) before any hashing work
//! - insufficient approvals (`InsufficientCount`), reporting the count reached
//! - bootstrap precondition failure (`InitFailed`)
//! - host failures (`Storage`, `Config`)
//!
//! Per-signature problems are never errors here; the counter skips them.
//! Every error leaves the committee, nonce and config untouched.

use shared_types::Nonce;
use thiserror::Error;

/// Why a proposed roster was rejected. First violation wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitteeViolation {
    /// Size outside `[MIN_COMMITTEE_SIZE, MAX_COMMITTEE_SIZE]`
    Size(usize),
    /// Zero address at this position
    ZeroMember(usize),
    /// Repeat of an earlier member at this position
    DuplicateMember(usize),
}

impl std::fmt::Display for CommitteeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitteeViolation::Size(len) => write!(f, "size {len} out of bounds"),
            CommitteeViolation::ZeroMember(i) => write!(f, "zero address at index {i}"),
            CommitteeViolation::DuplicateMember(i) => write!(f, "duplicate member at index {i}"),
        }
    }
}

/// Which bootstrap precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitViolation {
    /// Committee does not have exactly one member
    CommitteeNotSingleton(usize),
    /// Caller is not the sole member
    UnauthorizedCaller,
    /// Requested nonce is not strictly greater than the current one
    NonceNotIncreasing { current: Nonce, requested: Nonce },
}

impl std::fmt::Display for InitViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitViolation::CommitteeNotSingleton(len) => {
                write!(f, "committee has {len} members, expected 1")
            }
            InitViolation::UnauthorizedCaller => write!(f, "caller is not the sole member"),
            InitViolation::NonceNotIncreasing { current, requested } => {
                write!(f, "requested nonce {requested} not above current {current}")
            }
        }
    }
}

/// Committee sync errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Proposed committee failed structural validation
    #[error("Invalid committee: {0}")]
    InvalidCommittee(CommitteeViolation),

    /// Not enough distinct current-member approvals
    #[error("Insufficient approvals: have {count}, need {required}")]
    InsufficientCount { count: usize, required: usize },

    /// Bootstrap path refused
    #[error("Init failed: {0}")]
    InitFailed(InitViolation),

    /// Current nonce is `u64::MAX`; no further transition can be signed
    #[error("Nonce space exhausted")]
    NonceExhausted,

    /// Staged state could not be persisted; nothing was published
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    /// Service configuration rejected
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl SyncError {
    /// Stable label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            SyncError::InvalidCommittee(_) => "invalid_committee",
            SyncError::InsufficientCount { .. } => "insufficient_count",
            SyncError::InitFailed(_) => "init_failed",
            SyncError::NonceExhausted => "nonce_exhausted",
            SyncError::Storage { .. } => "storage",
            SyncError::Config { .. } => "config",
        }
    }
}

/// Result type for committee sync operations
pub type SyncResult<T> = Result<T, SyncError>;
