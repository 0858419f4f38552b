//! # Committee Sync Service
//!
//! Application service that implements the `CommitteeSyncApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`CommitteeSyncApi`)
//! - Uses the outbound ports (`StateStore`, `EventSink`, `TimeSource`)
//! - Delegates signature recovery to a `SignerRecovery` implementation
//! - Delegates every state rule to the domain layer
//!
//! ## Commit Protocol
//!
//! Every mutating call holds the write lock for its whole duration:
//!
//! 1. Clone the published state into a scratch copy and read the clock
//! 2. Run the domain transition on the scratch
//! 3. Persist the scratch through `StateStore`
//! 4. Replace the published state with the scratch
//! 5. Emit events
//!
//! A failure at 2 or 3 drops the scratch; readers never observe it. The clock
//! is read under the lock, so `updated` never moves backwards across commits
//! given a monotonic `TimeSource`.

use crate::config::SyncConfig;
use crate::domain::digest::DigestBuilder;
use crate::domain::entities::{SyncOutcome, SyncStep};
use crate::domain::state::CommitteeState;
use crate::domain::transition::{apply_batch, apply_init, TransitionContext};
use crate::error::{SyncError, SyncResult};
use crate::events::CommitteeEvent;
use crate::ports::inbound::CommitteeSyncApi;
use crate::ports::outbound::{EventSink, StateStore, TimeSource};
use cs_01_signature_recovery::SignerRecovery;
use parking_lot::RwLock;
use shared_types::{short_hex, Address, ConfigEntry, ConfigRecord, Hash, Nonce, Timestamp};
use sync_telemetry::{
    metric_inc, subsystem_span, time_histogram, BOOTSTRAP_INITS, COMMITTEE_SIZE, CURRENT_NONCE,
    SIGNATURES_COUNTED, SIGNATURES_SKIPPED, SYNC_DURATION, SYNC_REJECTIONS, TRANSITIONS_APPLIED,
};
use tracing::{info, warn};

/// Committee Sync Service.
pub struct CommitteeSyncService<R, S, E, T>
where
    R: SignerRecovery,
    S: StateStore,
    E: EventSink,
    T: TimeSource,
{
    config: SyncConfig,
    digest: DigestBuilder,
    recovery: R,
    store: S,
    events: E,
    clock: T,
    state: RwLock<CommitteeState>,
}

impl<R, S, E, T> CommitteeSyncService<R, S, E, T>
where
    R: SignerRecovery,
    S: StateStore,
    E: EventSink,
    T: TimeSource,
{
    /// Resume from the state held by `store`.
    ///
    /// # Errors
    /// * `SyncError::Config` - `config` fails validation
    /// * `SyncError::Storage` - the store is unreadable or empty
    pub fn open(config: SyncConfig, recovery: R, store: S, events: E, clock: T) -> SyncResult<Self> {
        let state = store.load()?.ok_or_else(|| SyncError::Storage {
            reason: "no persisted committee state".into(),
        })?;
        Self::with_state(config, recovery, store, events, clock, state)
    }

    /// Start a fresh replica whose committee is the single `seed` member.
    ///
    /// The genesis state is persisted before the service is returned.
    pub fn genesis(
        config: SyncConfig,
        recovery: R,
        store: S,
        events: E,
        clock: T,
        seed: Address,
    ) -> SyncResult<Self> {
        check_config(&config, &recovery)?;
        let state = CommitteeState::genesis(seed);
        store.persist(&state)?;
        info!(seed = %short_hex(&seed), "Genesis committee state created");
        Self::with_state(config, recovery, store, events, clock, state)
    }

    fn with_state(
        config: SyncConfig,
        recovery: R,
        store: S,
        events: E,
        clock: T,
        state: CommitteeState,
    ) -> SyncResult<Self> {
        check_config(&config, &recovery)?;
        record_state_gauges(&state);

        Ok(Self {
            digest: config.digest_builder(),
            config,
            recovery,
            store,
            events,
            clock,
            state: RwLock::new(state),
        })
    }

    /// Domain separator bound into every digest this replica accepts.
    pub fn domain_separator(&self) -> Hash {
        self.digest.domain_separator()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Run `transition` on a scratch copy, persist, publish, then `announce`.
    /// The clock is read and `announce` runs under the write lock.
    fn commit<O, F, A>(&self, operation: &'static str, transition: F, announce: A) -> SyncResult<O>
    where
        F: FnOnce(&mut CommitteeState, Timestamp) -> SyncResult<O>,
        A: FnOnce(&O),
    {
        let mut state = self.state.write();
        let _span = subsystem_span!("commit", operation, nonce = state.nonce()).entered();
        let _timer = time_histogram!(SYNC_DURATION);
        let now = self.clock.now();
        let mut scratch = state.clone();

        let result = transition(&mut scratch, now).and_then(|output| {
            self.store.persist(&scratch)?;
            Ok(output)
        });

        match result {
            Ok(output) => {
                record_state_gauges(&scratch);
                *state = scratch;
                announce(&output);
                Ok(output)
            }
            Err(e) => {
                metric_inc!(SYNC_REJECTIONS, &[operation, e.reason()]);
                warn!(operation, nonce = state.nonce(), error = %e, "Transition rejected");
                Err(e)
            }
        }
    }

    fn run_steps(&self, operation: &'static str, steps: &[SyncStep]) -> SyncResult<Vec<SyncOutcome>> {
        self.commit(
            operation,
            |state, now| {
                let ctx = TransitionContext {
                    digest: &self.digest,
                    recovery: &self.recovery,
                    threshold_bps: self.config.threshold_bps,
                    now,
                };
                apply_batch(state, &ctx, steps)
            },
            |outcomes| {
                for outcome in outcomes {
                    record_tally(outcome);
                    info!(
                        nonce = outcome.nonce,
                        committee_size = outcome.committee.len(),
                        approvals = outcome.count(),
                        digest = %short_hex(&outcome.digest),
                        "Committee transition applied"
                    );
                    self.events.publish(CommitteeEvent::RosterChanged {
                        nonce: outcome.nonce,
                        committee: outcome.committee.clone(),
                        count: outcome.count(),
                        digest: outcome.digest,
                    });
                }
                TRANSITIONS_APPLIED.inc_by(outcomes.len() as f64);
            },
        )
    }
}

impl<R, S, E, T> CommitteeSyncApi for CommitteeSyncService<R, S, E, T>
where
    R: SignerRecovery,
    S: StateStore,
    E: EventSink,
    T: TimeSource,
{
    fn sync(&self, step: SyncStep) -> SyncResult<SyncOutcome> {
        let mut outcomes = self.run_steps("sync", std::slice::from_ref(&step))?;
        outcomes.pop().ok_or_else(|| SyncError::Storage {
            reason: "transition produced no outcome".into(),
        })
    }

    fn syncs(&self, steps: Vec<SyncStep>) -> SyncResult<Vec<SyncOutcome>> {
        if steps.is_empty() {
            return Ok(Vec::new());
        }
        self.run_steps("syncs", &steps)
    }

    fn init(&self, caller: Address, nonce: Nonce) -> SyncResult<Nonce> {
        self.commit(
            "init",
            |state, _| apply_init(state, &caller, nonce),
            |&nonce| {
                metric_inc!(BOOTSTRAP_INITS);
                info!(nonce, caller = %short_hex(&caller), "Nonce initialized");
                self.events.publish(CommitteeEvent::NonceInitialized { nonce });
            },
        )
    }

    fn hash(&self, nonce: Nonce, committee: &[Address], config: &[ConfigEntry]) -> Hash {
        self.digest.digest(nonce, committee, config)
    }

    fn committee(&self) -> Vec<Address> {
        self.state.read().committee().to_vec()
    }

    fn is_member(&self, id: &Address) -> bool {
        self.state.read().is_member(id)
    }

    fn index_of(&self, id: &Address) -> Option<usize> {
        self.state.read().index_of(id)
    }

    fn config(&self, account: &Address) -> ConfigRecord {
        self.state
            .read()
            .config(account)
            .cloned()
            .unwrap_or_default()
    }

    fn nonce(&self) -> Nonce {
        self.state.read().nonce()
    }

    fn updated(&self) -> Timestamp {
        self.state.read().updated()
    }

    fn snapshot(&self) -> CommitteeState {
        self.state.read().clone()
    }
}

/// Validate `config` and make sure `recovery` enforces the configured scheme.
fn check_config<R: SignerRecovery>(config: &SyncConfig, recovery: &R) -> SyncResult<()> {
    config.validate()?;
    match recovery.signing_scheme() {
        Some(scheme) if scheme != config.signing_scheme => Err(SyncError::Config {
            reason: format!(
                "recovery enforces {scheme} but signing_scheme is {}",
                config.signing_scheme
            ),
        }),
        _ => Ok(()),
    }
}

fn record_state_gauges(state: &CommitteeState) {
    COMMITTEE_SIZE.set(state.committee().len() as f64);
    CURRENT_NONCE.set(state.nonce() as f64);
}

fn record_tally(outcome: &SyncOutcome) {
    let tally = &outcome.tally;
    SIGNATURES_COUNTED.inc_by(tally.count as f64);
    for (reason, skipped) in [
        ("unrecoverable", tally.malformed),
        ("non_member", tally.non_members),
        ("duplicate", tally.duplicates),
    ] {
        if skipped > 0 {
            SIGNATURES_SKIPPED
                .with_label_values(&[reason])
                .inc_by(skipped as f64);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BroadcastEventSink, FixedTimeSource, InMemoryStateStore};
    use crate::error::InitViolation;
    use cs_01_signature_recovery::test_helpers::{address_of, generate_keypair, sign_digest};
    use cs_01_signature_recovery::{EcdsaRecoverer, SigningScheme};
    use k256::ecdsa::SigningKey;

    type TestService =
        CommitteeSyncService<EcdsaRecoverer, InMemoryStateStore, BroadcastEventSink, FixedTimeSource>;

    fn service_with_seed(seed: &SigningKey) -> TestService {
        CommitteeSyncService::genesis(
            SyncConfig::default(),
            EcdsaRecoverer::default(),
            InMemoryStateStore::new(),
            BroadcastEventSink::new(),
            FixedTimeSource::new(1_000),
            address_of(seed),
        )
        .unwrap()
    }

    fn signed_step(
        service: &TestService,
        nonce: Nonce,
        committee: Vec<Address>,
        signers: &[&SigningKey],
    ) -> SyncStep {
        let digest = service.hash(nonce, &committee, &[]);
        let signatures = signers
            .iter()
            .map(|k| sign_digest(SigningScheme::PersonalMessage, &digest, k))
            .collect();
        SyncStep::new(committee, vec![], signatures)
    }

    #[test]
    fn test_genesis_persists() {
        let (seed, _) = generate_keypair();
        let service = service_with_seed(&seed);

        assert_eq!(service.committee(), vec![address_of(&seed)]);
        assert_eq!(service.store().stored(), Some(service.snapshot()));
    }

    #[test]
    fn test_sync_from_seed_publishes_event() {
        let (seed, _) = generate_keypair();
        let service = service_with_seed(&seed);
        let mut rx = service.events().subscribe();

        let members: Vec<Address> = vec![[1; 20], [2; 20], [3; 20]];
        let step = signed_step(&service, 1, members.clone(), &[&seed]);
        let outcome = service.sync(step).unwrap();

        assert_eq!(outcome.nonce, 1);
        assert_eq!(service.committee(), members);
        assert_eq!(service.updated(), 1_000);
        assert_eq!(service.store().stored().unwrap().nonce(), 1);

        match rx.try_recv().unwrap() {
            CommitteeEvent::RosterChanged { nonce, count, .. } => {
                assert_eq!(nonce, 1);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_storage_failure_publishes_nothing() {
        let (seed, _) = generate_keypair();
        let service = service_with_seed(&seed);
        let mut rx = service.events().subscribe();
        let before = service.snapshot();

        service.store().set_fail_writes(true);
        let step = signed_step(&service, 1, vec![[1; 20], [2; 20], [3; 20]], &[&seed]);

        assert!(matches!(service.sync(step), Err(SyncError::Storage { .. })));
        assert_eq!(service.snapshot(), before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_init_by_seed() {
        let (seed, _) = generate_keypair();
        let service = service_with_seed(&seed);

        assert_eq!(service.init(address_of(&seed), 100), Ok(100));
        assert_eq!(service.nonce(), 100);
        assert_eq!(service.updated(), 0);
        assert_eq!(
            service.init([0xEE; 20], 200),
            Err(SyncError::InitFailed(InitViolation::UnauthorizedCaller))
        );
    }

    #[test]
    fn test_open_requires_state() {
        let result = TestService::open(
            SyncConfig::default(),
            EcdsaRecoverer::default(),
            InMemoryStateStore::new(),
            BroadcastEventSink::new(),
            FixedTimeSource::new(0),
        );
        assert!(matches!(result, Err(SyncError::Storage { .. })));
    }

    #[test]
    fn test_open_rejects_bad_config() {
        let store = InMemoryStateStore::with_state(CommitteeState::genesis([0xAA; 20]));
        let config = SyncConfig {
            threshold_bps: 0,
            ..Default::default()
        };
        let result = TestService::open(
            config,
            EcdsaRecoverer::default(),
            store,
            BroadcastEventSink::new(),
            FixedTimeSource::new(0),
        );
        assert!(matches!(result, Err(SyncError::Config { .. })));
    }

    #[test]
    fn test_genesis_rejects_scheme_mismatch() {
        let config = SyncConfig {
            signing_scheme: SigningScheme::Prehash,
            ..Default::default()
        };
        let store = InMemoryStateStore::new();
        let result = CommitteeSyncService::genesis(
            config,
            EcdsaRecoverer::default(),
            store,
            BroadcastEventSink::new(),
            FixedTimeSource::new(0),
            [0xAA; 20],
        );
        assert!(matches!(result, Err(SyncError::Config { .. })));
    }

    #[test]
    fn test_prehash_replica_accepts_prehash_approvals() {
        let (seed, _) = generate_keypair();
        let config = SyncConfig {
            signing_scheme: SigningScheme::Prehash,
            ..Default::default()
        };
        let service = CommitteeSyncService::genesis(
            config.clone(),
            config.recoverer(),
            InMemoryStateStore::new(),
            BroadcastEventSink::new(),
            FixedTimeSource::new(0),
            address_of(&seed),
        )
        .unwrap();

        let committee = vec![[1; 20], [2; 20], [3; 20]];
        let digest = service.hash(1, &committee, &[]);
        let signature = sign_digest(SigningScheme::Prehash, &digest, &seed);
        assert!(service.sync(SyncStep::new(committee, vec![], vec![signature])).is_ok());
    }

    #[test]
    fn test_unset_config_reads_default() {
        let (seed, _) = generate_keypair();
        let service = service_with_seed(&seed);
        assert_eq!(service.config(&[0x42; 20]), ConfigRecord::default());
    }
}
