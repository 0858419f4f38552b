//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `ZERO_ADDRESS`
//! - **Commitments**: `Hash`, `Nonce`, `Timestamp`
//! - **Configuration**: `ConfigEntry` (proposed), `ConfigRecord` (stored)
//! - **Approvals**: `RawSignature`

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// A 32-byte keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address (last 20 bytes of keccak256(pubkey)).
pub type Address = [u8; 20];

/// Monotonic roster counter. Every accepted transition consumes `nonce + 1`.
pub type Nonce = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// An opaque recoverable signature as supplied off-band (65 bytes for ECDSA).
pub type RawSignature = Vec<u8>;

/// The null identity. Never a valid committee member.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// A configuration update carried by a proposal.
///
/// Submitting an entry overwrites both `version` and `value` for `account`.
/// An empty `value` clears the stored blob but still records the version.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Account the entry applies to.
    #[serde_as(as = "Hex")]
    pub account: Address,
    /// Caller-supplied version; not checked for monotonicity.
    pub version: u64,
    /// Opaque configuration blob.
    #[serde_as(as = "Hex")]
    #[serde(default)]
    pub value: Vec<u8>,
}

impl ConfigEntry {
    pub fn new(account: Address, version: u64, value: impl Into<Vec<u8>>) -> Self {
        Self {
            account,
            version,
            value: value.into(),
        }
    }

    /// Split into the key and the record that gets stored under it.
    pub fn into_record(self) -> (Address, ConfigRecord) {
        (
            self.account,
            ConfigRecord {
                version: self.version,
                value: self.value,
            },
        )
    }
}

/// The stored configuration for one account.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub version: u64,
    #[serde_as(as = "Hex")]
    #[serde(default)]
    pub value: Vec<u8>,
}

impl ConfigRecord {
    /// True when the blob has been cleared (or never set).
    pub fn is_cleared(&self) -> bool {
        self.value.is_empty()
    }
}

/// Parse a hex address, with or without a `0x` prefix.
pub fn parse_address(input: &str) -> Result<Address, ParseError> {
    let bytes = decode_hex(input)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ParseError::InvalidLength {
            expected: 20,
            actual: b.len(),
        })
}

/// Parse a hex digest, with or without a `0x` prefix.
pub fn parse_hash(input: &str) -> Result<Hash, ParseError> {
    let bytes = decode_hex(input)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ParseError::InvalidLength {
            expected: 32,
            actual: b.len(),
        })
}

/// Decode a hex string, tolerating a `0x` prefix.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(stripped).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

/// First four bytes of an identifier, for compact log fields.
pub fn short_hex(bytes: impl AsRef<[u8]>) -> String {
    let bytes = bytes.as_ref();
    let end = bytes.len().min(4);
    format!("0x{}..", hex::encode(&bytes[..end]))
}
