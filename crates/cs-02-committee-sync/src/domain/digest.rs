//! # Digest Builder
//!
//! Canonical commitment over `(nonce, committee, config)` that committee
//! members sign.
//!
//! ```text
//! committeeHash   = keccak(word(id_0) || ... || word(id_k))
//! configHash      = keccak(keccak(word(account) || word(version) || keccak(value)) || ...)
//! structHash      = keccak(SYNC_TYPEHASH || word(nonce) || committeeHash || configHash)
//! domainSeparator = keccak(DOMAIN_TYPEHASH || keccak(name) || keccak(version))
//! digest          = keccak(domainSeparator || structHash)
//! ```
//!
//! `word(x)` is a 32-byte ABI word: addresses left-padded, integers big-endian.
//!
//! The domain separator binds only the protocol name and version string. No
//! replica or host identity goes in, so one signed proposal is valid on every
//! replica that shares the version string. Bumping the version is the only way
//! to invalidate every outstanding proposal.

use cs_01_signature_recovery::keccak256;
use shared_types::{Address, ConfigEntry, Hash, Nonce};

/// Type string hashed into the domain separator.
pub const DOMAIN_TYPE: &str = "EIP712Domain(string name,string version)";

/// Type string hashed into every struct hash.
pub const SYNC_TYPE: &str =
    "Sync(uint256 nonce,address[] committee,Config[] config)Config(address account,uint64 version,bytes value)";

/// Builds digests for one protocol name and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestBuilder {
    domain_separator: Hash,
}

impl DigestBuilder {
    pub fn new(protocol_name: &str, protocol_version: &str) -> Self {
        Self {
            domain_separator: domain_separator(protocol_name, protocol_version),
        }
    }

    pub fn domain_separator(&self) -> Hash {
        self.domain_separator
    }

    /// Digest a committee member signs to approve `(nonce, committee, config)`.
    pub fn digest(&self, nonce: Nonce, committee: &[Address], config: &[ConfigEntry]) -> Hash {
        let struct_hash = struct_hash(nonce, &committee_hash(committee), &config_hash(config));
        keccak256(&[self.domain_separator, struct_hash].concat())
    }
}

/// `keccak(DOMAIN_TYPEHASH || keccak(name) || keccak(version))`
pub fn domain_separator(protocol_name: &str, protocol_version: &str) -> Hash {
    keccak256(
        &[
            keccak256(DOMAIN_TYPE.as_bytes()),
            keccak256(protocol_name.as_bytes()),
            keccak256(protocol_version.as_bytes()),
        ]
        .concat(),
    )
}

/// Order-sensitive hash of the roster.
pub fn committee_hash(committee: &[Address]) -> Hash {
    let words: Vec<[u8; 32]> = committee.iter().map(address_word).collect();
    keccak256(&words.concat())
}

/// Hash of a single configuration entry.
pub fn config_entry_hash(entry: &ConfigEntry) -> Hash {
    keccak256(
        &[
            address_word(&entry.account),
            u64_word(entry.version),
            keccak256(&entry.value),
        ]
        .concat(),
    )
}

/// Order-sensitive hash over the entry hashes.
pub fn config_hash(config: &[ConfigEntry]) -> Hash {
    let hashes: Vec<Hash> = config.iter().map(config_entry_hash).collect();
    keccak256(&hashes.concat())
}

/// `keccak(SYNC_TYPEHASH || word(nonce) || committeeHash || configHash)`
pub fn struct_hash(nonce: Nonce, committee_hash: &Hash, config_hash: &Hash) -> Hash {
    keccak256(
        &[
            keccak256(SYNC_TYPE.as_bytes()),
            u64_word(nonce),
            *committee_hash,
            *config_hash,
        ]
        .concat(),
    )
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}

fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}
