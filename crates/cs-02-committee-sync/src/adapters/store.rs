//! # State Stores
//!
//! `InMemoryStateStore` keeps the last persisted state in memory.
//! `JsonFileStateStore` keeps it in one JSON file, replaced atomically via a
//! sibling temp file and `rename`.

use crate::domain::state::CommitteeState;
use crate::error::{SyncError, SyncResult};
use crate::ports::outbound::StateStore;
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

fn storage_error(context: &str, e: impl std::fmt::Display) -> SyncError {
    SyncError::Storage {
        reason: format!("{context}: {e}"),
    }
}

/// In-memory store for tests and ephemeral replicas.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: Mutex<Option<CommitteeState>>,
    fail_writes: AtomicBool,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `state`.
    pub fn with_state(state: CommitteeState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `persist` fail (simulates a full disk).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Last persisted state.
    pub fn stored(&self) -> Option<CommitteeState> {
        self.state.lock().clone()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self) -> SyncResult<Option<CommitteeState>> {
        Ok(self.state.lock().clone())
    }

    fn persist(&self, state: &CommitteeState) -> SyncResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(storage_error("persist", "writes disabled"));
        }
        *self.state.lock() = Some(state.clone());
        Ok(())
    }
}

/// One JSON file per replica.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self) -> SyncResult<Option<CommitteeState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| storage_error(&format!("read {}", self.path.display()), e))?;
        let state = serde_json::from_str(&raw)
            .map_err(|e| storage_error(&format!("decode {}", self.path.display()), e))?;
        Ok(Some(state))
    }

    fn persist(&self, state: &CommitteeState) -> SyncResult<()> {
        let encoded =
            serde_json::to_vec_pretty(state).map_err(|e| storage_error("encode state", e))?;

        let temp = self.temp_path();
        let written = write_synced(&temp, &encoded)
            .map_err(|e| storage_error(&format!("write {}", temp.display()), e))
            .and_then(|_| {
                fs::rename(&temp, &self.path)
                    .map_err(|e| storage_error(&format!("rename to {}", self.path.display()), e))
            });
        if written.is_err() {
            let _ = fs::remove_file(&temp);
        }
        written?;

        debug!(path = %self.path.display(), nonce = state.nonce(), "State persisted");
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
