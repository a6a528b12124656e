//! Pool state file.
//!
//! The CLI is stateless between invocations, so the pool lives on disk as a
//! CBOR envelope:
//!
//! ```text
//! StateFile { format_version, revision, checksum = SHA-256(payload), payload = CBOR(PoolSnapshot) }
//! ```
//!
//! The checksum is verified on every load. `revision` increments on each
//! save. Writes go to a uniquely named sibling temp file that is renamed
//! into place, so a crash never leaves a half-written state file.
//!
//! Several processes may share one state file. A read-modify-write cycle
//! holds a [`StateLock`] (an exclusive advisory lock on `<state>.lock`) from
//! load to commit, so overlapping callers queue instead of overwriting each
//! other. [`commit_state`] additionally refuses to write unless the file is
//! still at the revision the caller loaded.

use crate::pool::PoolSnapshot;
use crate::serialization::{from_cbor, to_cbor, SerializationError};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Current on-disk format.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// State file errors.
#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("State file '{0}' does not exist. Run `treasury init` first.")]
    Missing(String),

    #[error("State file '{0}' already exists. Use --force to overwrite.")]
    AlreadyExists(String),

    #[error("Unsupported state format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("State file checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("State file changed concurrently: loaded revision {loaded}, found {found}")]
    RevisionConflict { loaded: u64, found: u64 },

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// On-disk envelope around a [`PoolSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub format_version: u32,
    pub revision: u64,
    pub checksum: [u8; 32],
    pub payload: Vec<u8>,
}

fn checksum(payload: &[u8]) -> [u8; 32] {
    Sha256::digest(payload).into()
}

impl StateFile {
    /// Wrap a snapshot as the given revision.
    pub fn seal(snapshot: &PoolSnapshot, revision: u64) -> Result<Self, StateFileError> {
        let payload = to_cbor(snapshot)?;
        Ok(Self {
            format_version: STATE_FORMAT_VERSION,
            revision,
            checksum: checksum(&payload),
            payload,
        })
    }

    /// Verify and decode the snapshot.
    pub fn open(&self) -> Result<PoolSnapshot, StateFileError> {
        if self.format_version != STATE_FORMAT_VERSION {
            return Err(StateFileError::UnsupportedVersion {
                found: self.format_version,
                expected: STATE_FORMAT_VERSION,
            });
        }

        let actual = checksum(&self.payload);
        if actual != self.checksum {
            return Err(StateFileError::ChecksumMismatch {
                expected: hex::encode(self.checksum),
                actual: hex::encode(actual),
            });
        }

        Ok(from_cbor(&self.payload)?)
    }

    pub fn read(path: &Path) -> Result<Self, StateFileError> {
        if !path.exists() {
            return Err(StateFileError::Missing(path.display().to_string()));
        }
        let bytes = fs::read(path).map_err(|source| StateFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(from_cbor(&bytes)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), StateFileError> {
        let io_err = |source| StateFileError::Io {
            path: path.display().to_string(),
            source,
        };

        let dir = parent_dir(path);
        fs::create_dir_all(dir).map_err(io_err)?;

        let bytes = to_cbor(self)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Exclusive advisory lock over one state file, released on drop.
///
/// The lock lives on a sibling `<state>.lock` file because the state file
/// itself is replaced on every write.
#[derive(Debug)]
pub struct StateLock {
    _file: File,
    path: PathBuf,
}

impl StateLock {
    /// Block until no other holder has the lock for `state_path`.
    pub fn acquire(state_path: &Path) -> Result<Self, StateFileError> {
        let path = lock_path(state_path);
        let io_err = |source| StateFileError::Io {
            path: path.display().to_string(),
            source,
        };

        fs::create_dir_all(parent_dir(&path)).map_err(io_err)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(io_err)?;
        file.lock_exclusive().map_err(io_err)?;

        tracing::trace!(path = %path.display(), "state lock acquired");
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_path(state_path: &Path) -> PathBuf {
    let mut name = OsString::from(state_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Load the snapshot and its revision from `path`.
pub fn load_state(path: &Path) -> Result<(PoolSnapshot, u64), StateFileError> {
    let file = StateFile::read(path)?;
    let snapshot = file.open()?;
    Ok((snapshot, file.revision))
}

/// Persist `snapshot` at `path` as `revision`.
pub fn save_state(path: &Path, snapshot: &PoolSnapshot, revision: u64) -> Result<(), StateFileError> {
    StateFile::seal(snapshot, revision)?.write(path)?;
    tracing::debug!(path = %path.display(), revision, "pool state saved");
    Ok(())
}

/// Write `snapshot` as the revision after `loaded_revision`.
///
/// Fails with [`StateFileError::RevisionConflict`] if someone else saved
/// since the caller loaded. Callers hold the [`StateLock`] across
/// load and commit. Returns the new revision.
pub fn commit_state(
    path: &Path,
    snapshot: &PoolSnapshot,
    loaded_revision: u64,
) -> Result<u64, StateFileError> {
    let found = StateFile::read(path)?.revision;
    if found != loaded_revision {
        return Err(StateFileError::RevisionConflict {
            loaded: loaded_revision,
            found,
        });
    }
    let revision = loaded_revision + 1;
    save_state(path, snapshot, revision)?;
    Ok(revision)
}

/// Create a fresh, empty state file.
pub fn init_state(path: &Path, force: bool) -> Result<(), StateFileError> {
    let _lock = StateLock::acquire(path)?;
    if path.exists() && !force {
        return Err(StateFileError::AlreadyExists(path.display().to_string()));
    }
    save_state(path, &PoolSnapshot::default(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountId, Amount};
    use tempfile::TempDir;

    fn funded_snapshot() -> PoolSnapshot {
        let mut snapshot = PoolSnapshot::default();
        snapshot
            .ledger
            .deposit(AccountId::from_bytes([1; 20]), Amount::from_base_units(10))
            .unwrap();
        snapshot
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pool.cbor");
        let snapshot = funded_snapshot();

        save_state(&path, &snapshot, 7).unwrap();
        let (loaded, revision) = load_state(&path).unwrap();

        assert_eq!(loaded, snapshot);
        assert_eq!(revision, 7);
        // Only the state file itself remains; no temp files linger.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_commit_rejects_stale_revision() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pool.cbor");
        init_state(&path, false).unwrap();

        assert_eq!(commit_state(&path, &funded_snapshot(), 0).unwrap(), 1);
        assert!(matches!(
            commit_state(&path, &PoolSnapshot::default(), 0),
            Err(StateFileError::RevisionConflict {
                loaded: 0,
                found: 1
            })
        ));

        let (loaded, revision) = load_state(&path).unwrap();
        assert_eq!(loaded, funded_snapshot());
        assert_eq!(revision, 1);
    }

    #[test]
    fn test_lock_serializes_holders() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pool.cbor");
        let first = StateLock::acquire(&path).unwrap();
        assert_eq!(first.path(), dir.path().join("pool.cbor.lock"));

        let released = Arc::new(AtomicBool::new(false));
        let waiter = {
            let path = path.clone();
            let released = Arc::clone(&released);
            std::thread::spawn(move || {
                let _second = StateLock::acquire(&path).unwrap();
                released.load(Ordering::SeqCst)
            })
        };

        std::thread::sleep(Duration::from_millis(100));
        released.store(true, Ordering::SeqCst);
        drop(first);

        assert!(waiter.join().unwrap(), "second holder got the lock early");
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let result = load_state(&dir.path().join("absent.cbor"));
        assert!(matches!(result, Err(StateFileError::Missing(_))));
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pool.cbor");

        init_state(&path, false).unwrap();
        save_state(&path, &funded_snapshot(), 1).unwrap();

        assert!(matches!(
            init_state(&path, false),
            Err(StateFileError::AlreadyExists(_))
        ));

        init_state(&path, true).unwrap();
        let (loaded, revision) = load_state(&path).unwrap();
        assert_eq!(loaded, PoolSnapshot::default());
        assert_eq!(revision, 0);
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        let mut file = StateFile::seal(&funded_snapshot(), 1).unwrap();
        let last = file.payload.len() - 1;
        file.payload[last] ^= 0x01;

        assert!(matches!(
            file.open(),
            Err(StateFileError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_format_version_rejected() {
        let mut file = StateFile::seal(&PoolSnapshot::default(), 0).unwrap();
        file.format_version = 99;
        assert!(matches!(
            file.open(),
            Err(StateFileError::UnsupportedVersion {
                found: 99,
                expected: STATE_FORMAT_VERSION
            })
        ));
    }
}
