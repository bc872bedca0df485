//! Count-and-noun formatting for status lines.

/// `1 file`, `3 files`, `0 messages`.
///
/// Only regular `-s` plurals; callers pick nouns that fit.
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
