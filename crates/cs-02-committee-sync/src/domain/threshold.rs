//! # Threshold Policy
//!
//! Minimum number of distinct current-member approvals:
//! `max(1, ceil(n * threshold_bps / 10_000))`, always over the committee size
//! *before* the update.

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default approval share: 60%.
pub const DEFAULT_THRESHOLD_BPS: u16 = 6_000;

/// Approvals required from a committee of `committee_size`.
///
/// Ceiling division; never returns 0, so a singleton committee needs its one
/// member.
pub fn required_approvals(committee_size: usize, threshold_bps: u16) -> usize {
    let scaled = committee_size as u64 * threshold_bps as u64;
    let required = scaled.div_ceil(BPS_DENOMINATOR);
    required.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rounds_up() {
        // floor(6 * 0.6) = 3 would under-count by one
        assert_eq!(required_approvals(6, DEFAULT_THRESHOLD_BPS), 4);
        assert_eq!(required_approvals(3, DEFAULT_THRESHOLD_BPS), 2);
        assert_eq!(required_approvals(4, DEFAULT_THRESHOLD_BPS), 3);
        assert_eq!(required_approvals(7, DEFAULT_THRESHOLD_BPS), 5);
    }

    #[test]
    fn test_exact_multiples() {
        assert_eq!(required_approvals(5, DEFAULT_THRESHOLD_BPS), 3);
        assert_eq!(required_approvals(10, DEFAULT_THRESHOLD_BPS), 6);
        assert_eq!(required_approvals(255, DEFAULT_THRESHOLD_BPS), 153);
    }

    #[test]
    fn test_floor_of_one() {
        assert_eq!(required_approvals(1, DEFAULT_THRESHOLD_BPS), 1);
        assert_eq!(required_approvals(0, DEFAULT_THRESHOLD_BPS), 1);
        assert_eq!(required_approvals(3, 1), 1);
    }

    #[test]
    fn test_unanimity() {
        assert_eq!(required_approvals(9, 10_000), 9);
    }

    proptest! {
        #[test]
        fn prop_threshold_is_ceiling(n in 1usize..=255, bps in 1u16..=10_000) {
            let required = required_approvals(n, bps);
            let scaled = n as u64 * bps as u64;
            // required * 10000 >= n * bps, and one fewer falls short
            prop_assert!(required as u64 * BPS_DENOMINATOR >= scaled);
            prop_assert!(required == 1 || (required as u64 - 1) * BPS_DENOMINATOR < scaled);
            prop_assert!(required <= n);
        }
    }
}
