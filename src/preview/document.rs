//! Preview document builder.
//!
//! Produces one self-contained HTML document:
//!
//! ```text
//! <head>  title, instrumentation shim, user style
//! <body>  user markup, guarded user script
//! ```
//!
//! The shim always precedes the user script. User style and script are
//! embedded with their closing-tag sequences neutralised so they cannot end
//! their enclosing element early.

use std::borrow::Cow;
use std::ops::Range;

use super::template::{Template, TemplateVars};

/// Default `<title>` of the preview document.
pub const DEFAULT_TITLE: &str = "Preview";

/// Instrumentation shim (console overrides + global error hooks).
const SHIM_JS: &str = include_str!("shim.js");

const TITLE: &str = "__PLAYPEN_TITLE__";
const SHIM: &str = "__PLAYPEN_SHIM__";
const STYLE: &str = "__PLAYPEN_STYLE__";
const MARKUP: &str = "__PLAYPEN_MARKUP__";
const SCRIPT: &str = "__PLAYPEN_SCRIPT__";

/// Variables for document.html.
struct DocumentVars<'a> {
    title: &'a str,
    style: &'a str,
    markup: &'a str,
    script: &'a str,
}

impl TemplateVars for DocumentVars<'_> {
    fn values(&self) -> Vec<(&'static str, &str)> {
        vec![
            (TITLE, self.title),
            (SHIM, SHIM_JS),
            (STYLE, self.style),
            (MARKUP, self.markup),
            (SCRIPT, self.script),
        ]
    }
}

const DOCUMENT_HTML: Template = Template::new(include_str!("document.html"));

// =============================================================================
// PreviewDocument
// =============================================================================

/// A built preview document with the location of its instrumented parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    html: String,
    shim: Range<usize>,
    script: Range<usize>,
}

impl PreviewDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Byte range of the instrumentation shim.
    pub fn shim_range(&self) -> Range<usize> {
        self.shim.clone()
    }

    /// Byte range of the (escaped) user script.
    pub fn script_range(&self) -> Range<usize> {
        self.script.clone()
    }

    /// The user script as embedded in the document.
    #[cfg(test)]
    pub fn user_script(&self) -> &str {
        &self.html[self.script.clone()]
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds preview documents. Pure and deterministic.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    title: String,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl DocumentBuilder {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            title: escape_text(title.as_ref()).into_owned(),
        }
    }

    pub fn build(&self, markup: &str, style: &str, script: &str) -> PreviewDocument {
        let style = neutralize_closing(style, "style");
        let script = neutralize_script(script);

        let rendered = DOCUMENT_HTML.render(&DocumentVars {
            title: &self.title,
            style: &style,
            markup,
            script: &script,
        });

        // Both placeholders are part of the static template.
        let shim = rendered.span(SHIM).unwrap_or(0..0);
        let script = rendered.span(SCRIPT).unwrap_or(0..0);

        PreviewDocument {
            html: rendered.text,
            shim,
            script,
        }
    }
}

/// Build a preview document with the default title.
#[cfg(test)]
pub fn build(markup: &str, style: &str, script: &str) -> PreviewDocument {
    DocumentBuilder::default().build(markup, style, script)
}

// =============================================================================
// Escaping
// =============================================================================

/// Rewrite `</tag` (ASCII case-insensitive) to `<\/tag`.
fn neutralize_closing<'a>(text: &'a str, tag: &str) -> Cow<'a, str> {
    let needle = format!("</{tag}");
    // ASCII lowercasing keeps byte offsets identical.
    let lower = text.to_ascii_lowercase();
    if !lower.contains(&needle) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for (pos, _) in lower.match_indices(&needle) {
        out.push_str(&text[last..pos]);
        out.push_str("<\\/");
        last = pos + 2;
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Script content additionally must not open an HTML comment, which would
/// switch the tokenizer into the escaped script state.
fn neutralize_script(script: &str) -> Cow<'_, str> {
    match neutralize_closing(script, "script") {
        Cow::Borrowed(s) if !s.contains("<!--") => Cow::Borrowed(s),
        cow => Cow::Owned(cow.replace("<!--", "<\\!--")),
    }
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

// =============================================================================
// Tests
// =============================================================================
