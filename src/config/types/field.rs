//! Dotted config field path, e.g. `preview.debounce_ms`.

use crate::logger::paint;
use owo_colors::Style;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", paint(format_args!("`{}`", self.0), Style::new().bright_blue()))
    }
}

