//! `[sandbox]` section configuration.
//!
//! ```toml
//! [sandbox]
//! command = ["node", "runner.js"]   # Empty runs the embedded node runner
//! load_timeout_ms = 0               # 0 disables the load timeout
//! ```
//!
//! The runner starts in the config file's directory and receives the preview
//! document on stdin. It must define `window.__playpenBridge(json)` before
//! the shim runs and print each string passed to it as one stdout line, then
//! print `{"type":"ready"}` once the document's scripts have run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Program and arguments. Empty means the embedded node runner.
    pub command: Vec<String>,
    pub load_timeout_ms: u64,
}

impl SandboxConfig {
    pub const COMMAND: FieldPath = FieldPath::new("sandbox.command");

    pub fn load_timeout(&self) -> Option<Duration> {
        (self.load_timeout_ms > 0).then(|| Duration::from_millis(self.load_timeout_ms))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(program) = self.command.first()
            && program.trim().is_empty()
        {
            diag.error_with_hint(
                Self::COMMAND,
                "program name is empty",
                "use e.g. command = [\"node\", \"runner.js\"]",
            );
        }
    }
}
