//! # Signature Recovery Subsystem (CS-01)
//!
//! Recovers the address that produced a committee approval signature.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): The `SignerRecovery` trait consumed by the sync engine
//! - **Service Layer** (`service.rs`): `EcdsaRecoverer`, the default implementation
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - **Scheme Pinning**: The signing scheme is fixed per deployment. Changing it
//!   invalidates every outstanding approval.

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub use domain::ecdsa::test_helpers;

// Re-export public API
pub use domain::ecdsa::{address_from_pubkey, keccak256, recover_address};
pub use domain::entities::{EcdsaSignature, SigningScheme, SIGNATURE_LENGTH};
pub use domain::errors::SignatureError;
pub use ports::inbound::SignerRecovery;
pub use service::EcdsaRecoverer;
