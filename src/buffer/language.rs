//! Buffer language identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three editable buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Js,
}

impl Language {
    /// All languages in display order (markup, style, script).
    pub const ALL: [Language; 3] = [Language::Html, Language::Css, Language::Js];

    /// Slot index inside the store.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Html => 0,
            Self::Css => 1,
            Self::Js => 2,
        }
    }

    /// Short lowercase name (also the persisted/shared field name).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    /// Human-readable label for status output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Js => "JavaScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown buffer name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown buffer `{0}` (expected html, css or js)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" => Ok(Self::Html),
            "css" | "style" => Ok(Self::Css),
            "js" | "script" | "javascript" => Ok(Self::Js),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("HTML".parse::<Language>(), Ok(Language::Html));
        assert_eq!("style".parse::<Language>(), Ok(Language::Css));
        assert_eq!(" javascript ".parse::<Language>(), Ok(Language::Js));
    }

    #[test]
    fn test_parse_unknown_fails() {
        let err = "python".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("python"));
    }

    #[test]
    fn test_indices_are_distinct() {
        let indices: Vec<_> = Language::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
