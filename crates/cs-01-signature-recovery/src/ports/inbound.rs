//! # Inbound Ports (Driving Ports / API)
//!
//! The recovery primitive as seen by the committee sync engine. Hosts with a
//! different signature family implement this trait instead of using
//! `EcdsaRecoverer`.

use crate::domain::entities::SigningScheme;
use crate::domain::errors::SignatureError;
use shared_types::{Address, Hash};

/// Recovers the identity that approved a committee digest.
///
/// Implementations must be thread-safe (`Send + Sync`) and pure: the same
/// `(digest, signature)` pair always yields the same result.
pub trait SignerRecovery: Send + Sync {
    /// Recover the signer of `signature` over `digest`.
    ///
    /// Any error means the approval is discarded; callers never abort on it.
    fn recover_signer(&self, digest: &Hash, signature: &[u8]) -> Result<Address, SignatureError>;

    /// Digest wrapping this implementation enforces, if it uses one.
    fn signing_scheme(&self) -> Option<SigningScheme> {
        None
    }
}
