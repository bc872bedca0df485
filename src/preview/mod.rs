//! Preview document synthesis.
//!
//! # Module Structure
//!
//! - `template` - Single-pass placeholder substitution
//! - `document` - Builds the executable preview document from three buffers
//!
//! # Usage
//!
//! ```ignore
//! let document = preview::build("<p>hi</p>", "p { color: red }", "console.log('x')");
//! assert!(document.shim_range().end < document.script_range().start);
//! ```

mod document;
mod template;

pub use document::{DEFAULT_TITLE, DocumentBuilder, PreviewDocument};
#[cfg(test)]
pub use document::build;
