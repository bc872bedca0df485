//! Playground configuration from `playpen.toml`.
//!
//! ```text
//! config/
//! ├── section/   # [preview] [sandbox] [log] [storage] [share]
//! ├── types/     # ConfigError, diagnostics, field paths
//! └── mod.rs     # PlaypenConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults.
//! Validation collects all problems and reports them at once.

pub mod section;
pub mod types;
mod util;

pub use section::{LogConfig, PreviewConfig, SandboxConfig, ShareConfig, StorageConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{debug, log};

/// Default config file name.
pub const CONFIG_FILE: &str = "playpen.toml";

/// Root configuration structure representing `playpen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaypenConfig {
    /// Config file path, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub share: ShareConfig,
}

impl PlaypenConfig {
    /// Locate, parse, and validate the config.
    ///
    /// `config_name` is searched upward from the working directory. When no
    /// file is found the defaults apply, rooted at the working directory.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match util::find_config_file(&cwd, config_name) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", config_name.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());
        log!("warning"; "ignoring unknown fields in {}:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Anchor relative paths at `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        if self.storage.dir.is_relative() {
            self.storage.dir = root.join(&self.storage.dir);
        }
    }

    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.preview.validate(&mut diag);
        self.sandbox.validate(&mut diag);
        self.log.validate(&mut diag);
        self.storage.validate(&mut diag);
        self.share.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields so typos in tests surface.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PlaypenConfig {
    let (parsed, ignored) = PlaypenConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_toml() {
        let result = PlaypenConfig::parse_with_ignored("[preview\ndebounce_ms = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(PlaypenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_every_error() {
        let config = test_parse_config(
            "[preview]\ndebounce_ms = 0\n\
             [log]\ncapacity = 0\n\
             [storage]\nkey = \"\"\nvalidity_hours = 0\n\
             [share]\nbase_url = \"not a url\"\nparam = \"\"",
        );

        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "preview.debounce_ms",
                "log.capacity",
                "storage.key",
                "storage.validity_hours",
                "share.base_url",
                "share.param",
            ]
        );
    }

    #[test]
    fn test_unknown_fields_detected() {
        let (config, ignored) =
            PlaypenConfig::parse_with_ignored("[log]\ncapacity = 7\n[unknown]\nfield = 1").unwrap();
        assert_eq!(config.log.capacity, 7);
        assert!(ignored.iter().any(|f| f.contains("unknown")));
    }

    #[test]
    fn test_finalize_resolves_storage_dir() {
        let mut config = PlaypenConfig::default();
        config.finalize(Path::new("/work/lesson"));
        assert_eq!(config.root, Path::new("/work/lesson"));
        assert_eq!(config.storage.dir, Path::new("/work/lesson/.playpen"));

        let mut config = test_parse_config("[storage]\ndir = \"/var/playpen\"");
        config.finalize(Path::new("/work/lesson"));
        assert_eq!(config.storage.dir, Path::new("/var/playpen"));
    }
}
