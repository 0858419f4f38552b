//! # Committee Sync Integration Tests
//!
//! Drives `CommitteeSyncService` through the public `CommitteeSyncApi` with
//! real secp256k1 keys, an in-memory store and a broadcast event sink.
//!
//! Each test builds a replica at genesis, hands the committee over to a
//! keyed committee of the size it needs, then exercises one behaviour.

use cs_01_signature_recovery::test_helpers::{address_of, generate_keypair, sign_digest};
use cs_01_signature_recovery::{EcdsaRecoverer, SigningScheme};
use cs_02_committee_sync::{
    BroadcastEventSink, CommitteeEvent, CommitteeSyncApi, CommitteeSyncService, CommitteeViolation,
    FixedTimeSource, InMemoryStateStore, InitViolation, SyncConfig, SyncError, SyncStep,
};
use k256::ecdsa::SigningKey;
use shared_types::{Address, ConfigEntry, ConfigRecord, Nonce};

type Replica =
    CommitteeSyncService<EcdsaRecoverer, InMemoryStateStore, BroadcastEventSink, FixedTimeSource>;

struct Harness {
    replica: Replica,
    seed: SigningKey,
}

impl Harness {
    fn new() -> Self {
        let (seed, _) = generate_keypair();
        let replica = CommitteeSyncService::genesis(
            SyncConfig::default(),
            EcdsaRecoverer::default(),
            InMemoryStateStore::new(),
            BroadcastEventSink::new(),
            FixedTimeSource::new(1_700_000_000),
            address_of(&seed),
        )
        .unwrap();
        Self { replica, seed }
    }

    /// Harness whose current committee is `n` fresh keys, installed by the seed.
    fn with_committee(n: usize) -> (Self, Vec<SigningKey>) {
        let harness = Self::new();
        let keys: Vec<SigningKey> = (0..n).map(|_| generate_keypair().0).collect();
        let step = harness.step(1, addresses(&keys), vec![], &[&harness.seed]);
        harness.replica.sync(step).unwrap();
        (harness, keys)
    }

    fn step(
        &self,
        nonce: Nonce,
        committee: Vec<Address>,
        config: Vec<ConfigEntry>,
        signers: &[&SigningKey],
    ) -> SyncStep {
        let digest = self.replica.hash(nonce, &committee, &config);
        let signatures = signers
            .iter()
            .map(|key| sign_digest(SigningScheme::PersonalMessage, &digest, key))
            .collect();
        SyncStep::new(committee, config, signatures)
    }
}

fn addresses(keys: &[SigningKey]) -> Vec<Address> {
    keys.iter().map(address_of).collect()
}

fn successor() -> Vec<Address> {
    vec![[0x11; 20], [0x22; 20], [0x33; 20]]
}

#[test]
fn test_threshold_rounds_up_for_six_members() {
    let (h, keys) = Harness::with_committee(6);
    let before = h.replica.snapshot();

    // Three of six is 50%; the ceiling of 60% needs four
    let step = h.step(2, successor(), vec![], &[&keys[0], &keys[1], &keys[2]]);
    assert_eq!(
        h.replica.sync(step),
        Err(SyncError::InsufficientCount {
            count: 3,
            required: 4
        })
    );
    assert_eq!(h.replica.snapshot(), before);

    let step = h.step(2, successor(), vec![], &[&keys[0], &keys[1], &keys[2], &keys[3]]);
    let outcome = h.replica.sync(step).unwrap();
    assert_eq!(outcome.count(), 4);
    assert_eq!(h.replica.committee(), successor());
    assert_eq!(h.replica.nonce(), 2);
}

#[test]
fn test_duplicate_signatures_count_once() {
    let (h, keys) = Harness::with_committee(3);

    // Required is 2; the same signer twice must not reach it
    let step = h.step(2, successor(), vec![], &[&keys[0], &keys[0]]);
    assert_eq!(
        h.replica.sync(step),
        Err(SyncError::InsufficientCount {
            count: 1,
            required: 2
        })
    );
}

#[test]
fn test_non_member_and_malformed_are_skipped() {
    let (h, keys) = Harness::with_committee(3);
    let (outsider, _) = generate_keypair();

    let mut step = h.step(2, successor(), vec![], &[&outsider, &keys[0], &keys[1]]);
    step.signatures.insert(1, vec![0xFF; 7]);

    let outcome = h.replica.sync(step).unwrap();
    assert_eq!(outcome.count(), 2);
    assert_eq!(outcome.tally.non_members, 1);
    assert_eq!(outcome.tally.malformed, 1);
}

#[test]
fn test_replay_fails() {
    let (h, keys) = Harness::with_committee(3);
    let step = h.step(2, addresses(&keys), vec![], &[&keys[0], &keys[1]]);

    h.replica.sync(step.clone()).unwrap();
    let updated = h.replica.updated();

    assert!(matches!(
        h.replica.sync(step),
        Err(SyncError::InsufficientCount { count: 0, .. })
    ));
    assert_eq!(h.replica.nonce(), 2);
    assert_eq!(h.replica.updated(), updated);
}

#[test]
fn test_signed_for_wrong_nonce_fails() {
    let (h, keys) = Harness::with_committee(3);

    // Current nonce is 1, so the target is 2, not 3
    let step = h.step(3, successor(), vec![], &[&keys[0], &keys[1], &keys[2]]);
    assert!(matches!(
        h.replica.sync(step),
        Err(SyncError::InsufficientCount { count: 0, .. })
    ));
}

#[test]
fn test_invalid_roster_rejected_before_counting() {
    let (h, keys) = Harness::with_committee(3);
    let all: Vec<&SigningKey> = keys.iter().collect();

    let two = h.step(2, vec![[1; 20], [2; 20]], vec![], &all);
    assert_eq!(
        h.replica.sync(two),
        Err(SyncError::InvalidCommittee(CommitteeViolation::Size(2)))
    );

    let zero = h.step(2, vec![[1; 20], [0; 20], [2; 20]], vec![], &all);
    assert_eq!(
        h.replica.sync(zero),
        Err(SyncError::InvalidCommittee(CommitteeViolation::ZeroMember(1)))
    );

    let dup = h.step(2, vec![[1; 20], [2; 20], [1; 20]], vec![], &all);
    assert_eq!(
        h.replica.sync(dup),
        Err(SyncError::InvalidCommittee(CommitteeViolation::DuplicateMember(2)))
    );
    assert_eq!(h.replica.nonce(), 1);
}

#[test]
fn test_empty_batch_is_noop() {
    let (h, _) = Harness::with_committee(3);
    let before = h.replica.snapshot();
    let mut rx = h.replica.events().subscribe();

    assert_eq!(h.replica.syncs(vec![]), Ok(vec![]));
    assert_eq!(h.replica.snapshot(), before);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_batch_failure_keeps_nothing() {
    let (h, keys) = Harness::with_committee(3);
    let before = h.replica.snapshot();
    let stored_before = h.replica.store().stored();
    let mut rx = h.replica.events().subscribe();

    let first = h.step(
        2,
        addresses(&keys),
        vec![ConfigEntry::new([0x77; 20], 1, vec![0xAB])],
        &[&keys[0], &keys[1]],
    );
    let second = h.step(3, successor(), vec![], &[&keys[2]]);

    assert_eq!(
        h.replica.syncs(vec![first, second]),
        Err(SyncError::InsufficientCount {
            count: 1,
            required: 2
        })
    );
    assert_eq!(h.replica.snapshot(), before);
    assert_eq!(h.replica.store().stored(), stored_before);
    assert_eq!(h.replica.config(&[0x77; 20]), ConfigRecord::default());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_batch_hands_over_between_steps() {
    let (h, keys) = Harness::with_committee(3);
    let next: Vec<SigningKey> = (0..4).map(|_| generate_keypair().0).collect();
    let mut rx = h.replica.events().subscribe();

    let first = h.step(2, addresses(&next), vec![], &[&keys[0], &keys[1]]);
    // Four members need three approvals from the committee installed by step one
    let second = h.step(3, successor(), vec![], &[&next[0], &next[1], &next[3]]);

    let outcomes = h.replica.syncs(vec![first, second]).unwrap();
    assert_eq!(outcomes.iter().map(|o| o.nonce).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(h.replica.committee(), successor());

    // Events arrive in application order
    assert_eq!(rx.try_recv().unwrap().nonce(), 2);
    assert_eq!(rx.try_recv().unwrap().nonce(), 3);
}

#[test]
fn test_init_then_sync_at_next_nonce() {
    let h = Harness::new();
    let seed = address_of(&h.seed);
    let mut rx = h.replica.events().subscribe();

    assert_eq!(h.replica.init(seed, 100), Ok(100));
    assert_eq!(h.replica.nonce(), 100);
    assert_eq!(
        rx.try_recv().unwrap(),
        CommitteeEvent::NonceInitialized { nonce: 100 }
    );

    // Signed for 1 no longer counts
    let stale = h.step(1, successor(), vec![], &[&h.seed]);
    assert!(h.replica.sync(stale).is_err());

    let fresh = h.step(101, successor(), vec![], &[&h.seed]);
    assert_eq!(h.replica.sync(fresh).unwrap().nonce, 101);

    // Bootstrap is over once the committee grows
    assert_eq!(
        h.replica.init(seed, 500),
        Err(SyncError::InitFailed(InitViolation::CommitteeNotSingleton(3)))
    );
}

#[test]
fn test_init_preconditions() {
    let h = Harness::new();
    let seed = address_of(&h.seed);

    assert_eq!(
        h.replica.init([0x99; 20], 10),
        Err(SyncError::InitFailed(InitViolation::UnauthorizedCaller))
    );
    h.replica.init(seed, 10).unwrap();
    assert_eq!(
        h.replica.init(seed, 10),
        Err(SyncError::InitFailed(InitViolation::NonceNotIncreasing {
            current: 10,
            requested: 10
        }))
    );
    assert_eq!(h.replica.nonce(), 10);
}

#[test]
fn test_config_clear_keeps_version_and_others() {
    let (h, keys) = Harness::with_committee(3);
    let members = addresses(&keys);

    let set = h.step(
        2,
        members.clone(),
        vec![
            ConfigEntry::new([0xA1; 20], 1, vec![1, 2, 3]),
            ConfigEntry::new([0xB2; 20], 7, vec![9]),
        ],
        &[&keys[0], &keys[1]],
    );
    h.replica.sync(set).unwrap();

    let clear = h.step(
        3,
        members,
        vec![ConfigEntry::new([0xA1; 20], 2, Vec::new())],
        &[&keys[1], &keys[2]],
    );
    h.replica.sync(clear).unwrap();

    assert_eq!(
        h.replica.config(&[0xA1; 20]),
        ConfigRecord {
            version: 2,
            value: Vec::new()
        }
    );
    assert_eq!(
        h.replica.config(&[0xB2; 20]),
        ConfigRecord {
            version: 7,
            value: vec![9]
        }
    );
}

#[test]
fn test_read_accessors() {
    let (h, keys) = Harness::with_committee(3);
    let members = addresses(&keys);

    assert_eq!(h.replica.committee(), members);
    assert_eq!(h.replica.index_of(&members[2]), Some(2));
    assert_eq!(h.replica.index_of(&[0x42; 20]), None);
    assert!(h.replica.is_member(&members[0]));
    assert!(!h.replica.is_member(&address_of(&h.seed)));
    assert_eq!(h.replica.updated(), 1_700_000_000);
}

#[test]
fn test_updated_tracks_clock() {
    let (h, keys) = Harness::with_committee(3);
    h.replica.clock().set(1_800_000_000);
    h.replica.sync(h.step(2, addresses(&keys), vec![], &[&keys[0], &keys[1]])).unwrap();
    assert_eq!(h.replica.updated(), 1_800_000_000);

    // A rejected call leaves the stamp alone
    h.replica.clock().set(1_900_000_000);
    let bad = h.step(3, successor(), vec![], &[&keys[0]]);
    assert!(h.replica.sync(bad).is_err());
    assert_eq!(h.replica.updated(), 1_800_000_000);
}
