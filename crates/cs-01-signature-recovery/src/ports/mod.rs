//! # Ports Layer
//!
//! - **Inbound (Driving)**: `SignerRecovery`, the primitive the sync engine calls

pub mod inbound;
