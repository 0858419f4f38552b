//! # Error Types
//!
//! Errors for decoding the shared identifier types from text.

use thiserror::Error;

/// Errors raised when parsing addresses, digests or blobs from hex.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input was not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length did not match the target type.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
