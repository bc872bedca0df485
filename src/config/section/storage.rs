//! `[storage]` section configuration.
//!
//! ```toml
//! [storage]
//! dir = ".playpen"           # Relative to the config file's directory
//! key = "playground-code"    # Snapshot is stored as <dir>/<key>.json
//! validity_hours = 24        # Older snapshots are ignored on load
//! autosave = false           # Save after every debounced render
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::persist::local::{DEFAULT_KEY, DEFAULT_VALIDITY};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
    pub validity_hours: u64,
    pub autosave: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".playpen"),
            key: DEFAULT_KEY.to_string(),
            validity_hours: DEFAULT_VALIDITY.as_secs() / 3600,
            autosave: false,
        }
    }
}

impl StorageConfig {
    pub const KEY: FieldPath = FieldPath::new("storage.key");
    pub const VALIDITY_HOURS: FieldPath = FieldPath::new("storage.validity_hours");

    pub fn validity(&self) -> Duration {
        Duration::from_secs(self.validity_hours.saturating_mul(3600))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.key.trim().is_empty() {
            diag.error(Self::KEY, "must not be empty");
        } else if self.key.contains(['/', '\\']) {
            diag.error(Self::KEY, "must not contain path separators");
        }
        if self.validity_hours == 0 {
            diag.error(Self::VALIDITY_HOURS, "must be greater than 0");
        }
    }
}
