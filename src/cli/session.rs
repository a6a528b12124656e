//! Per-invocation pool access.
//!
//! Each CLI invocation loads the pool from the state file, runs one
//! operation against it and, for mutating commands, writes it back as the
//! next revision. The state lock is held from load until the loaded pool is
//! committed or dropped, so concurrent invocations apply one after another.
//! The clock is pinned for the whole invocation: either to `--now` or to the
//! wall clock at startup.

use std::path::{Path, PathBuf};
use treasury::clock::{Clock, MockClock, SystemClock};
use treasury::pool::Pool;
use treasury::storage::{commit_state, load_state, StateLock};

pub struct Session {
    state_path: PathBuf,
    clock: MockClock,
}

/// A pool loaded from disk together with the revision it was loaded at.
pub struct LoadedPool {
    pub pool: Pool<MockClock>,
    revision: u64,
    _lock: StateLock,
}

impl Session {
    pub fn new(state_path: PathBuf, now: Option<u64>) -> Self {
        let now = now.unwrap_or_else(|| SystemClock.now());
        Self {
            state_path,
            clock: MockClock::at(now),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Lock the state file and load the pool. The lock is released when the
    /// returned value is committed or dropped.
    pub fn load(&self) -> Result<LoadedPool, Box<dyn std::error::Error>> {
        let lock = StateLock::acquire(&self.state_path)?;
        let (snapshot, revision) = load_state(&self.state_path)?;
        tracing::debug!(
            path = %self.state_path.display(),
            revision,
            now = self.clock.now(),
            "pool state loaded"
        );
        Ok(LoadedPool {
            pool: Pool::from_snapshot(snapshot, self.clock.clone()),
            revision,
            _lock: lock,
        })
    }

    /// Persist the pool as the revision after the one it was loaded at.
    pub async fn commit(&self, loaded: LoadedPool) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = loaded.pool.snapshot().await;
        commit_state(&self.state_path, &snapshot, loaded.revision)?;
        Ok(())
    }
}
