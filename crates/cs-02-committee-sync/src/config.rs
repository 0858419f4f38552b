//! # Committee Sync Configuration
//!
//! Deployment parameters that every replica of one deployment must share.
//! Changing any of them changes which approvals are valid.
//!
//! | Variable | Default | Field |
//! |----------|---------|-------|
//! | `CS_PROTOCOL_NAME` | `committee-sync` | `protocol_name` |
//! | `CS_PROTOCOL_VERSION` | `1` | `protocol_version` |
//! | `CS_SIGNING_SCHEME` | `personal` | `signing_scheme` |
//! | `CS_THRESHOLD_BPS` | `6000` | `threshold_bps` |

use crate::domain::digest::DigestBuilder;
use crate::domain::threshold::{BPS_DENOMINATOR, DEFAULT_THRESHOLD_BPS};
use crate::error::{SyncError, SyncResult};
use cs_01_signature_recovery::{EcdsaRecoverer, SigningScheme};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tracing::warn;

pub const DEFAULT_PROTOCOL_NAME: &str = "committee-sync";
pub const DEFAULT_PROTOCOL_VERSION: &str = "1";

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Domain name bound into every digest.
    pub protocol_name: String,

    /// Domain version bound into every digest.
    pub protocol_version: String,

    /// How signers wrap the digest before signing.
    #[serde_as(as = "DisplayFromStr")]
    pub signing_scheme: SigningScheme,

    /// Approval share in basis points (6000 = 60%).
    pub threshold_bps: u16,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            protocol_name: DEFAULT_PROTOCOL_NAME.to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            signing_scheme: SigningScheme::default(),
            threshold_bps: DEFAULT_THRESHOLD_BPS,
        }
    }
}

impl SyncConfig {
    /// Defaults overridden by `CS_*` environment variables.
    ///
    /// Unparseable values are logged and ignored; call `validate` afterwards.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("CS_PROTOCOL_NAME") {
            config.protocol_name = name;
        }
        if let Ok(version) = std::env::var("CS_PROTOCOL_VERSION") {
            config.protocol_version = version;
        }
        if let Ok(raw) = std::env::var("CS_SIGNING_SCHEME") {
            match raw.parse() {
                Ok(scheme) => config.signing_scheme = scheme,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring CS_SIGNING_SCHEME"),
            }
        }
        if let Ok(raw) = std::env::var("CS_THRESHOLD_BPS") {
            match raw.parse() {
                Ok(bps) => config.threshold_bps = bps,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring CS_THRESHOLD_BPS"),
            }
        }

        config
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.protocol_name.is_empty() {
            return Err(SyncError::Config {
                reason: "protocol_name must not be empty".into(),
            });
        }
        if self.protocol_version.is_empty() {
            return Err(SyncError::Config {
                reason: "protocol_version must not be empty".into(),
            });
        }
        if self.threshold_bps == 0 || u64::from(self.threshold_bps) > BPS_DENOMINATOR {
            return Err(SyncError::Config {
                reason: format!("threshold_bps {} outside 1..=10000", self.threshold_bps),
            });
        }
        Ok(())
    }

    pub fn digest_builder(&self) -> DigestBuilder {
        DigestBuilder::new(&self.protocol_name, &self.protocol_version)
    }

    pub fn recoverer(&self) -> EcdsaRecoverer {
        EcdsaRecoverer::new(self.signing_scheme)
    }
}
