//! # State Transition Engine
//!
//! Pure transition functions over `CommitteeState`. Each function either
//! succeeds and leaves the state advanced, or fails and leaves it exactly as
//! it was.
//!
//! ## Sync (single step)
//!
//! 1. Roster check on the *proposed* committee
//! 2. Digest over `(nonce + 1, committee, config)`
//! 3. Count approvals against the *current* committee
//! 4. Compare against the threshold of the *current* committee size
//! 5. Install committee, advance nonce, stamp time, overwrite config
//!
//! ## Batch
//!
//! Steps run on a scratch copy; the scratch replaces the state only when every
//! step succeeded. Step k+1 is checked against the committee step k installed.
//!
//! ## Init
//!
//! Bootstrap-only nonce jump, allowed while the committee is the single seed
//! member and only for that member.

use crate::domain::counter::count_approvals;
use crate::domain::digest::DigestBuilder;
use crate::domain::entities::{SyncOutcome, SyncStep};
use crate::domain::roster::validate_committee;
use crate::domain::state::CommitteeState;
use crate::domain::threshold::required_approvals;
use crate::error::{InitViolation, SyncError, SyncResult};
use cs_01_signature_recovery::SignerRecovery;
use shared_types::{short_hex, Address, Nonce, Timestamp};
use tracing::{debug, warn};

/// Everything a transition needs besides the state itself.
pub struct TransitionContext<'a, R: ?Sized> {
    pub digest: &'a DigestBuilder,
    pub recovery: &'a R,
    pub threshold_bps: u16,
    /// Stamped into `updated` on success
    pub now: Timestamp,
}

/// Apply one signed step.
pub fn apply_sync<R>(
    state: &mut CommitteeState,
    ctx: &TransitionContext<'_, R>,
    step: &SyncStep,
) -> SyncResult<SyncOutcome>
where
    R: SignerRecovery + ?Sized,
{
    validate_committee(&step.committee)?;

    let target = state.nonce().checked_add(1).ok_or(SyncError::NonceExhausted)?;
    let digest = ctx.digest.digest(target, &step.committee, &step.config);

    let tally = count_approvals(ctx.recovery, &digest, state.committee(), &step.signatures);
    let required = required_approvals(state.committee().len(), ctx.threshold_bps);

    debug!(
        nonce = target,
        counted = tally.count,
        required,
        malformed = tally.malformed,
        non_members = tally.non_members,
        duplicates = tally.duplicates,
        "Approvals tallied"
    );

    if tally.count < required {
        return Err(SyncError::InsufficientCount {
            count: tally.count,
            required,
        });
    }

    state.replace_committee(step.committee.clone());
    state.set_nonce(target);
    state.set_updated(ctx.now);
    for entry in &step.config {
        state.apply_config(entry.clone());
    }

    Ok(SyncOutcome {
        nonce: target,
        committee: step.committee.clone(),
        digest,
        tally,
    })
}

/// Apply `steps` in order, all or nothing.
pub fn apply_batch<R>(
    state: &mut CommitteeState,
    ctx: &TransitionContext<'_, R>,
    steps: &[SyncStep],
) -> SyncResult<Vec<SyncOutcome>>
where
    R: SignerRecovery + ?Sized,
{
    if steps.is_empty() {
        return Ok(Vec::new());
    }

    let mut scratch = state.clone();
    let mut outcomes = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        match apply_sync(&mut scratch, ctx, step) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                if steps.len() > 1 {
                    warn!(step = index, of = steps.len(), error = %e, "Batch step rejected; batch discarded");
                }
                return Err(e);
            }
        }
    }

    *state = scratch;
    Ok(outcomes)
}

/// Bootstrap nonce jump by the sole seed member.
pub fn apply_init(state: &mut CommitteeState, caller: &Address, nonce: Nonce) -> SyncResult<Nonce> {
    let size = state.committee().len();
    if size != 1 {
        return Err(SyncError::InitFailed(InitViolation::CommitteeNotSingleton(size)));
    }

    if state.committee()[0] != *caller {
        warn!(caller = %short_hex(caller), "Init attempted by non-member");
        return Err(SyncError::InitFailed(InitViolation::UnauthorizedCaller));
    }

    if nonce <= state.nonce() {
        return Err(SyncError::InitFailed(InitViolation::NonceNotIncreasing {
            current: state.nonce(),
            requested: nonce,
        }));
    }

    state.set_nonce(nonce);
    Ok(nonce)
}
