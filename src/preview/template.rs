//! Template types for variable injection.
//!
//! Placeholders are substituted in a single left-to-right pass over the
//! template text. Substituted values are never rescanned, so user text that
//! happens to contain a placeholder name stays literal.

use std::ops::Range;

/// Trait for template variable sets.
pub trait TemplateVars {
    /// `(placeholder, value)` pairs to substitute.
    fn values(&self) -> Vec<(&'static str, &str)>;
}

/// Static template text with `__NAME__` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    content: &'static str,
}

/// Output of [`Template::render`]: the text plus where each value landed.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub text: String,
    /// `(placeholder, byte range in text)` for every substitution, in order.
    pub spans: Vec<(&'static str, Range<usize>)>,
}

impl Rendered {
    /// Byte range of the first substitution of `placeholder`.
    pub fn span(&self, placeholder: &str) -> Option<Range<usize>> {
        self.spans
            .iter()
            .find(|(name, _)| *name == placeholder)
            .map(|(_, range)| range.clone())
    }
}

impl Template {
    pub const fn new(content: &'static str) -> Self {
        Self { content }
    }

    pub fn render(&self, vars: &impl TemplateVars) -> Rendered {
        let values = vars.values();
        let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
        let mut text = String::with_capacity(self.content.len() + extra);
        let mut spans = Vec::with_capacity(values.len());
        let mut rest = self.content;

        // Earliest placeholder in the remaining template text wins.
        while let Some((pos, key, value)) = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, *value)))
            .min_by_key(|(pos, _, _)| *pos)
        {
            text.push_str(&rest[..pos]);
            let start = text.len();
            text.push_str(value);
            spans.push((key, start..text.len()));
            rest = &rest[pos + key.len()..];
        }
        text.push_str(rest);

        Rendered { text, spans }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair<'a> {
        a: &'a str,
        b: &'a str,
    }

    impl TemplateVars for Pair<'_> {
        fn values(&self) -> Vec<(&'static str, &str)> {
            vec![("__A__", self.a), ("__B__", self.b)]
        }
    }

    const PAIR: Template = Template::new("[__A__|__B__]");

    #[test]
    fn test_render_records_spans() {
        let rendered = PAIR.render(&Pair { a: "x", b: "yz" });
        assert_eq!(rendered.text, "[x|yz]");
        assert_eq!(rendered.span("__A__"), Some(1..2));
        assert_eq!(rendered.span("__B__"), Some(3..5));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let rendered = PAIR.render(&Pair { a: "__B__", b: "b" });
        assert_eq!(rendered.text, "[__B__|b]");
    }
}
