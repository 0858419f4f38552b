//! Subcommand handlers. Each returns the JSON text to print.

use crate::cli::Command;
use anyhow::{bail, Context, Result};
use cs_01_signature_recovery::EcdsaRecoverer;
use cs_02_committee_sync::{
    CommitteeSyncApi, CommitteeSyncService, JsonFileStateStore, NoopEventSink, SyncConfig,
    SyncStep, SystemTimeSource,
};
use serde::Deserialize;
use serde_json::json;
use shared_types::parse_address;
use std::fs;
use std::path::Path;
use sync_telemetry::encode_metrics;
use tracing::info;

type Replica = CommitteeSyncService<EcdsaRecoverer, JsonFileStateStore, NoopEventSink, SystemTimeSource>;

/// A batch file holds either an array of steps or one bare step.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Steps(Vec<SyncStep>),
    Step(SyncStep),
}

impl BatchFile {
    fn into_steps(self) -> Vec<SyncStep> {
        match self {
            BatchFile::Steps(steps) => steps,
            BatchFile::Step(step) => vec![step],
        }
    }
}

pub fn run(command: Command) -> Result<String> {
    run_with_config(command, SyncConfig::from_env())
}

/// Run `command` under an explicit deployment config.
pub fn run_with_config(command: Command, config: SyncConfig) -> Result<String> {
    match command {
        Command::Genesis { state, seed, force } => genesis(&state, &seed, force, config),
        Command::Show { state } => show(&open(&state, config)?),
        Command::Hash {
            state,
            proposal,
            nonce,
        } => hash(&open(&state, config)?, &proposal, nonce),
        Command::Apply { state, batch } => apply(&open(&state, config)?, &batch),
        Command::Init {
            state,
            caller,
            nonce,
        } => init(&open(&state, config)?, &caller, nonce),
    }
}

fn open(path: &Path, config: SyncConfig) -> Result<Replica> {
    let recoverer = config.recoverer();
    CommitteeSyncService::open(
        config,
        recoverer,
        JsonFileStateStore::new(path),
        NoopEventSink,
        SystemTimeSource,
    )
    .with_context(|| format!("opening replica at {}", path.display()))
}

fn genesis(path: &Path, seed: &str, force: bool, config: SyncConfig) -> Result<String> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let seed = parse_address(seed).context("parsing --seed")?;
    let recoverer = config.recoverer();

    let replica = CommitteeSyncService::genesis(
        config,
        recoverer,
        JsonFileStateStore::new(path),
        NoopEventSink,
        SystemTimeSource,
        seed,
    )?;
    info!(path = %path.display(), "Replica created");
    show(&replica)
}

fn show(replica: &Replica) -> Result<String> {
    let output = json!({
        "domain_separator": hex::encode(replica.domain_separator()),
        "state": replica.snapshot(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn hash(replica: &Replica, proposal: &Path, nonce: Option<u64>) -> Result<String> {
    let step: SyncStep = read_json(proposal)?;
    let nonce = match nonce {
        Some(nonce) => nonce,
        None => replica
            .nonce()
            .checked_add(1)
            .context("nonce space exhausted")?,
    };

    let digest = replica.hash(nonce, &step.committee, &step.config);
    let output = json!({
        "nonce": nonce,
        "digest": hex::encode(digest),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn apply(replica: &Replica, batch: &Path) -> Result<String> {
    let steps = read_json::<BatchFile>(batch)?.into_steps();
    let outcomes = replica.syncs(steps)?;
    Ok(serde_json::to_string_pretty(&outcomes)?)
}

fn init(replica: &Replica, caller: &str, nonce: u64) -> Result<String> {
    let caller = parse_address(caller).context("parsing --caller")?;
    let nonce = replica.init(caller, nonce)?;
    Ok(serde_json::to_string_pretty(&json!({ "nonce": nonce }))?)
}

/// Dump the process metrics in Prometheus text format.
pub fn write_metrics(path: &Path) -> Result<()> {
    let text = encode_metrics()?;
    fs::write(path, text).with_context(|| format!("writing metrics to {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("decoding {}", path.display()))
}
