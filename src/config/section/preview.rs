//! `[preview]` section configuration.
//!
//! ```toml
//! [preview]
//! debounce_ms = 500      # Quiescence window before an edit re-renders
//! title = "Preview"      # <title> of the generated document
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::preview::DEFAULT_TITLE;
use crate::schedule::DEFAULT_QUIESCENCE_MS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub debounce_ms: u64,
    pub title: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_QUIESCENCE_MS,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl PreviewConfig {
    pub const DEBOUNCE_MS: FieldPath = FieldPath::new("preview.debounce_ms");

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.error(Self::DEBOUNCE_MS, "must be greater than 0");
        }
    }
}
