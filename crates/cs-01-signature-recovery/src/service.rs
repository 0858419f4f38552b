//! # Signer Recovery Service
//!
//! Application service that implements the `SignerRecovery` port on top of
//! the ECDSA domain logic.
//!
//! The signing scheme is applied here: the digest handed in by the sync
//! engine is wrapped into the prehash the off-chain signer actually signed.

use crate::domain::ecdsa;
use crate::domain::entities::{EcdsaSignature, SigningScheme};
use crate::domain::errors::SignatureError;
use crate::ports::inbound::SignerRecovery;
use shared_types::{Address, Hash};
use tracing::trace;

/// secp256k1 signer recovery pinned to one signing scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaRecoverer {
    scheme: SigningScheme,
}

impl EcdsaRecoverer {
    /// Create a recoverer for approvals produced under `scheme`.
    pub fn new(scheme: SigningScheme) -> Self {
        Self { scheme }
    }

    /// The scheme this recoverer expects.
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }
}

impl SignerRecovery for EcdsaRecoverer {
    fn recover_signer(&self, digest: &Hash, signature: &[u8]) -> Result<Address, SignatureError> {
        let prehash = self.scheme.signing_hash(digest);
        EcdsaSignature::from_bytes(signature)
            .and_then(|signature| ecdsa::recover_address(&prehash, &signature))
            .inspect_err(|e| trace!(scheme = %self.scheme, error = %e, "Signer recovery failed"))
    }

    fn signing_scheme(&self) -> Option<SigningScheme> {
        Some(self.scheme)
    }
}

// =============================================================================
// TESTS
// =============================================================================
