//! # Domain Entities
//!
//! Signature encoding and the signing scheme applied on top of a digest.

use super::errors::SignatureError;
use serde::{Deserialize, Serialize};
use shared_types::Hash;
use std::fmt;
use std::str::FromStr;

/// Length of a raw `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Prefix prepended by `personal_sign` style signers for a 32-byte message.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

// =============================================================================
// ECDSA Types (secp256k1)
// =============================================================================

/// ECDSA signature on the secp256k1 curve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EcdsaSignature {
    /// Parse the 65-byte `r || s || v` encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        Ok(Self { r, s, v: bytes[64] })
    }

    /// Serialize as `r || s || v`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }
}

// =============================================================================
// Signing Scheme
// =============================================================================

/// How off-chain signers wrap the committee digest before signing.
///
/// Fixed per deployment: approvals produced under one scheme never recover to
/// a committee member under the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningScheme {
    /// The digest itself is the signed prehash.
    Prehash,
    /// `keccak256("\x19Ethereum Signed Message:\n32" || digest)` is signed.
    #[default]
    PersonalMessage,
}

impl SigningScheme {
    /// The 32-byte prehash a signer actually signs for `digest`.
    pub fn signing_hash(&self, digest: &Hash) -> Hash {
        match self {
            SigningScheme::Prehash => *digest,
            SigningScheme::PersonalMessage => {
                let mut buf = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 32);
                buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
                buf.extend_from_slice(digest);
                super::ecdsa::keccak256(&buf)
            }
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningScheme::Prehash => write!(f, "prehash"),
            SigningScheme::PersonalMessage => write!(f, "personal"),
        }
    }
}

impl FromStr for SigningScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prehash" | "raw" => Ok(SigningScheme::Prehash),
            "personal" | "personal_message" | "eip191" => Ok(SigningScheme::PersonalMessage),
            other => Err(format!("unknown signing scheme: {other}")),
        }
    }
}
