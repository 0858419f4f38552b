//! # Shared Types Crate
//!
//! This crate contains the identity, digest and configuration types used by
//! every crate in the committee-sync workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Hash` and the configuration
//!   records are defined here and nowhere else.
//! - **Fixed-width identities**: a committee member is a 20-byte address
//!   derived from its secp256k1 public key.
//! - **Hex on the wire**: every byte field serializes as a hex string so state
//!   files and proposal files stay human-readable.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
