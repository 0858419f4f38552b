//! # Roster Validator
//!
//! Structural acceptance rules for a proposed committee, checked in order:
//! size, zero entries, duplicates. Pure; reads nothing but the constants.

use crate::error::{CommitteeViolation, SyncError, SyncResult};
use shared_types::{Address, ZERO_ADDRESS};
use std::collections::HashSet;

/// Smallest committee a transition may install.
pub const MIN_COMMITTEE_SIZE: usize = 3;

/// Largest committee; also the width of the duplicate-signer bitset.
pub const MAX_COMMITTEE_SIZE: usize = 255;

/// Validate a proposed committee.
pub fn validate_committee(committee: &[Address]) -> SyncResult<()> {
    if !(MIN_COMMITTEE_SIZE..=MAX_COMMITTEE_SIZE).contains(&committee.len()) {
        return Err(SyncError::InvalidCommittee(CommitteeViolation::Size(
            committee.len(),
        )));
    }

    if let Some(index) = committee.iter().position(|id| *id == ZERO_ADDRESS) {
        return Err(SyncError::InvalidCommittee(CommitteeViolation::ZeroMember(
            index,
        )));
    }

    let mut seen = HashSet::with_capacity(committee.len());
    for (index, id) in committee.iter().enumerate() {
        if !seen.insert(id) {
            return Err(SyncError::InvalidCommittee(
                CommitteeViolation::DuplicateMember(index),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(i: u8) -> Address {
        [i; 20]
    }

    #[test]
    fn test_accepts_minimum_and_maximum_sizes() {
        let min: Vec<_> = (1..=3).map(member).collect();
        assert!(validate_committee(&min).is_ok());

        let max: Vec<_> = (1..=255u8).map(member).collect();
        assert!(validate_committee(&max).is_ok());
    }

    #[test]
    fn test_rejects_out_of_bounds_sizes() {
        let two: Vec<_> = (1..=2).map(member).collect();
        assert_eq!(
            validate_committee(&two),
            Err(SyncError::InvalidCommittee(CommitteeViolation::Size(2)))
        );

        let mut too_many: Vec<Address> = (1..=255u8).map(member).collect();
        let mut extra = [0x01; 20];
        extra[0] = 0xFF;
        extra[1] = 0x00;
        too_many.push(extra);
        assert_eq!(
            validate_committee(&too_many),
            Err(SyncError::InvalidCommittee(CommitteeViolation::Size(256)))
        );

        assert_eq!(
            validate_committee(&[]),
            Err(SyncError::InvalidCommittee(CommitteeViolation::Size(0)))
        );
    }

    #[test]
    fn test_rejects_zero_member() {
        let committee = vec![member(1), ZERO_ADDRESS, member(3)];
        assert_eq!(
            validate_committee(&committee),
            Err(SyncError::InvalidCommittee(CommitteeViolation::ZeroMember(1)))
        );
    }

    #[test]
    fn test_rejects_duplicate_member() {
        let committee = vec![member(1), member(2), member(1)];
        assert_eq!(
            validate_committee(&committee),
            Err(SyncError::InvalidCommittee(
                CommitteeViolation::DuplicateMember(2)
            ))
        );
    }

    #[test]
    fn test_size_checked_before_members() {
        // Two zero entries: size wins
        let committee = vec![ZERO_ADDRESS, ZERO_ADDRESS];
        assert_eq!(
            validate_committee(&committee),
            Err(SyncError::InvalidCommittee(CommitteeViolation::Size(2)))
        );
    }

    #[test]
    fn test_zero_checked_before_duplicates() {
        let committee = vec![member(1), member(1), ZERO_ADDRESS];
        assert_eq!(
            validate_committee(&committee),
            Err(SyncError::InvalidCommittee(CommitteeViolation::ZeroMember(2)))
        );
    }
}
