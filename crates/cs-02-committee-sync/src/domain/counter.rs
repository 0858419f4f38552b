//! # Signature Counter
//!
//! Counts distinct current-committee members whose approval recovers against
//! a digest. Malformed signatures, non-members and repeats are skipped, never
//! fatal. Dedup is by position in the current committee.

use crate::domain::entities::ApprovalTally;
use bitvec::prelude::*;
use cs_01_signature_recovery::SignerRecovery;
use shared_types::{short_hex, Address, Hash, RawSignature};
use tracing::debug;

/// Tally the approvals in `signatures` for `digest` against `committee`.
pub fn count_approvals<R>(
    recovery: &R,
    digest: &Hash,
    committee: &[Address],
    signatures: &[RawSignature],
) -> ApprovalTally
where
    R: SignerRecovery + ?Sized,
{
    let mut tally = ApprovalTally::default();
    let mut seen = bitvec![u8, Lsb0; 0; committee.len()];

    for (position, signature) in signatures.iter().enumerate() {
        let signer = match recovery.recover_signer(digest, signature) {
            Ok(signer) => signer,
            Err(e) => {
                debug!(position, error = %e, "Skipping unrecoverable approval");
                tally.malformed += 1;
                continue;
            }
        };

        let Some(index) = committee.iter().position(|member| *member == signer) else {
            debug!(position, signer = %short_hex(&signer), "Skipping non-member approval");
            tally.non_members += 1;
            continue;
        };

        if seen[index] {
            debug!(position, index, "Skipping duplicate approval");
            tally.duplicates += 1;
            continue;
        }

        seen.set(index, true);
        tally.count += 1;
    }

    tally
}
