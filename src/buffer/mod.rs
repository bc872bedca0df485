//! Source buffer store.
//!
//! Holds the three editable buffers (markup, style, script) with per-buffer
//! dirty flags. Every mutation goes through [`SourceBufferStore::set`] or
//! [`SourceBufferStore::restore`], which fire change notifications to the
//! registered listeners.
//!
//! # Example
//!
//! ```ignore
//! let mut store = SourceBufferStore::new(Buffers::default());
//! store.on_change(|change| println!("{change:?}"));
//! store.set(Language::Css, "p { color: red }");
//! let snapshot = store.snapshot();
//! ```

mod language;
pub mod starter;

pub use language::Language;

use serde::{Deserialize, Serialize};

use crate::utils::time::now_millis;

// =============================================================================
// Buffers / Snapshot
// =============================================================================

/// The three buffer texts, without any timestamp.
///
/// This is also the share payload shape: `{ html, css, js }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffers {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl Buffers {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Html => &self.html,
            Language::Css => &self.css,
            Language::Js => &self.js,
        }
    }

    fn slot_mut(&mut self, language: Language) -> &mut String {
        match language {
            Language::Html => &mut self.html,
            Language::Css => &mut self.css,
            Language::Js => &mut self.js,
        }
    }
}

/// Point-in-time copy of all buffers.
///
/// Serialized as `{ html, css, js, timestamp }` (timestamp in unix millis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub buffers: Buffers,
    #[serde(rename = "timestamp")]
    pub captured_at: u64,
}

impl Snapshot {
    pub fn new(buffers: Buffers, captured_at: u64) -> Self {
        Self {
            buffers,
            captured_at,
        }
    }

    /// Snapshot stamped with the current wall clock.
    pub fn now(buffers: Buffers) -> Self {
        Self::new(buffers, now_millis())
    }
}

// =============================================================================
// Store
// =============================================================================

/// What triggered a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A single buffer was replaced.
    Edited(Language),
    /// All buffers were replaced at once.
    Restored,
}

type Listener = Box<dyn FnMut(Change) + Send>;

/// Owner of the three source buffers.
pub struct SourceBufferStore {
    buffers: Buffers,
    dirty: [bool; 3],
    listeners: Vec<Listener>,
}

impl SourceBufferStore {
    pub fn new(initial: Buffers) -> Self {
        Self {
            buffers: initial,
            dirty: [false; 3],
            listeners: Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn on_change(&mut self, listener: impl FnMut(Change) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self, language: Language) -> &str {
        self.buffers.get(language)
    }

    /// Replace one buffer and notify once.
    ///
    /// Identical text still notifies; the store does not diff.
    pub fn set(&mut self, language: Language, text: impl Into<String>) {
        *self.buffers.slot_mut(language) = text.into();
        self.dirty[language.index()] = true;
        self.emit(Change::Edited(language));
    }

    /// Replace all buffers atomically, then notify exactly once.
    pub fn restore(&mut self, buffers: Buffers) {
        self.buffers = buffers;
        self.dirty = [true; 3];
        self.emit(Change::Restored);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::now(self.buffers.clone())
    }

    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    pub fn is_dirty(&self, language: Language) -> bool {
        self.dirty[language.index()]
    }

    /// Clear all dirty flags (after a successful save).
    pub fn clear_dirty(&mut self) {
        self.dirty = [false; 3];
    }

    fn emit(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(change);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
