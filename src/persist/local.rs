//! Local snapshot storage.
//!
//! One snapshot per key, stored as `<dir>/<key>.json` with the shape
//! `{ html, css, js, timestamp }`. Loading never fails: a missing, corrupt
//! or expired snapshot reads as `None`. Expired files are left in place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::buffer::Snapshot;
use crate::config::StorageConfig;
use crate::utils::time::now_millis;

/// Default storage key.
pub const DEFAULT_KEY: &str = "playground-code";

/// Default validity window of a stored snapshot.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

/// Snapshot write errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create storage directory `{0}`")]
    CreateDir(PathBuf, #[source] io::Error),

    #[error("failed to write snapshot `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("failed to serialize snapshot")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot store backed by a directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
    key: String,
    validity: Duration,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>, validity: Duration) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
            validity,
        }
    }

    /// Store configured by the `[storage]` section (dir already resolved).
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.dir, &config.key, config.validity())
    }

    /// File holding the snapshot.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Write `snapshot`, replacing any previous one atomically.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::CreateDir(self.dir.clone(), e))?;

        let json = serde_json::to_vec_pretty(snapshot)?;
        let path = self.path();
        let tmp = self.dir.join(format!(".{}.json.tmp", self.key));

        write_file(&tmp, &json).map_err(|e| StorageError::Write(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Write(path.clone(), e))?;

        crate::debug!("storage"; "saved snapshot to {}", path.display());
        Ok(())
    }

    /// Load the stored snapshot if present, well-formed and not expired.
    pub fn load(&self) -> Option<Snapshot> {
        self.load_at(now_millis())
    }

    /// [`LocalStore::load`] against an explicit clock (unix millis).
    pub fn load_at(&self, now: u64) -> Option<Snapshot> {
        let path = self.path();
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    crate::debug!("storage"; "cannot read {}: {}", path.display(), e);
                }
                return None;
            }
        };

        let snapshot: Snapshot = match serde_json::from_slice(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                crate::debug!("storage"; "ignoring corrupt snapshot {}: {}", path.display(), e);
                return None;
            }
        };

        let age = now.saturating_sub(snapshot.captured_at);
        if u128::from(age) > self.validity.as_millis() {
            crate::debug!("storage"; "ignoring expired snapshot ({} ms old)", age);
            return None;
        }

        Some(snapshot)
    }
}

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

// =============================================================================
// Tests
// =============================================================================
