//! `[share]` section configuration.
//!
//! ```toml
//! [share]
//! base_url = "https://playground.local/"   # Page that opens share links
//! param = "code"                           # Query parameter for the token
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::persist::share::DEFAULT_PARAM;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub base_url: String,
    pub param: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "https://playground.local/".to_string(),
            param: DEFAULT_PARAM.to_string(),
        }
    }
}

impl ShareConfig {
    pub const BASE_URL: FieldPath = FieldPath::new("share.base_url");
    pub const PARAM: FieldPath = FieldPath::new("share.param");

    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(err) = self.base_url() {
            diag.error_with_hint(
                Self::BASE_URL,
                format!("not a valid URL: {err}"),
                "include the scheme, e.g. https://playground.local/",
            );
        }
        if self.param.trim().is_empty() {
            diag.error(Self::PARAM, "must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_share_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.share.param, "code");
        assert_eq!(
            config.share.base_url().unwrap().as_str(),
            "https://playground.local/"
        );
    }

    #[test]
    fn test_share_override() {
        let config = test_parse_config("[share]\nbase_url = \"https://x.dev/p\"\nparam = \"s\"");
        assert_eq!(config.share.param, "s");
        assert_eq!(config.share.base_url().unwrap().path(), "/p");
    }
}
