//! `[log]` section configuration.
//!
//! ```toml
//! [log]
//! capacity = 50    # Visible log entries kept, oldest evicted first
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::sandbox::DEFAULT_LOG_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl LogConfig {
    pub const CAPACITY: FieldPath = FieldPath::new("log.capacity");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.capacity == 0 {
            diag.error(Self::CAPACITY, "must be greater than 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_log_capacity() {
        assert_eq!(test_parse_config("").log.capacity, 50);
        assert_eq!(test_parse_config("[log]\ncapacity = 5").log.capacity, 5);
    }
}
