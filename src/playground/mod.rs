//! Playground - one explicit instance of the live-preview engine.
//!
//! Owns the buffer store, debounce scheduler, document builder, sandbox
//! host, message relay and metrics, and runs them as a single actor.
//!
//! ```text
//! set/restore --> store --notify--> scheduler --fire--> render
//!                                                         |
//!              observers <-- relay <-- events <-- context (session N)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let handle = Playground::new(Box::new(ProcessBackend::new(command)))
//!     .with_storage(LocalStore::from_config(&config.storage))
//!     .with_observer(TerminalObserver)
//!     .spawn();
//! handle.set(Language::Js, "console.log('hi')");
//! ```

mod actor;
mod command;
mod handle;
mod messages;
mod observer;


pub use command::Command;
pub use handle::PlaygroundHandle;
pub use observer::Observer;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::buffer::starter::starter;
use crate::buffer::{Buffers, Language, SourceBufferStore};
use crate::config::PlaypenConfig;
use crate::metrics::MetricsCollector;
use crate::persist::LocalStore;
use crate::preview::{DEFAULT_TITLE, DocumentBuilder};
use crate::sandbox::{DEFAULT_LOG_CAPACITY, MessageRelay, SandboxBackend, SandboxHost};
use crate::schedule::{DEFAULT_QUIESCENCE_MS, DebounceScheduler};
use actor::PlaygroundActor;

/// Sandbox event channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// Playground builder.
pub struct Playground {
    backend: Box<dyn SandboxBackend>,
    debounce: Duration,
    title: String,
    log_capacity: usize,
    load_timeout: Option<Duration>,
    storage: Option<LocalStore>,
    autosave: bool,
    initial: Option<Buffers>,
    observers: Vec<Arc<dyn Observer>>,
}

impl Playground {
    pub fn new(backend: Box<dyn SandboxBackend>) -> Self {
        Self {
            backend,
            debounce: Duration::from_millis(DEFAULT_QUIESCENCE_MS),
            title: DEFAULT_TITLE.to_string(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            load_timeout: None,
            storage: None,
            autosave: false,
            initial: None,
            observers: Vec::new(),
        }
    }

    /// Apply `[preview]`, `[sandbox]`, `[log]` and `[storage]` settings.
    pub fn with_config(mut self, config: &PlaypenConfig) -> Self {
        self.title = config.preview.title.clone();
        self.load_timeout = config.sandbox.load_timeout();
        self.with_debounce(config.preview.debounce())
            .with_log_capacity(config.log.capacity)
            .with_storage(LocalStore::from_config(&config.storage))
            .with_autosave(config.storage.autosave)
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    #[cfg(test)]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    pub fn with_storage(mut self, storage: LocalStore) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Start from these buffers instead of the persisted or starter ones.
    pub fn with_buffers(mut self, buffers: Buffers) -> Self {
        self.initial = Some(buffers);
        self
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Buffers the playground opens with.
    ///
    /// Explicit buffers win, then a valid persisted snapshot, then the
    /// starter template.
    fn opening_buffers(&mut self) -> Buffers {
        if let Some(buffers) = self.initial.take() {
            return buffers;
        }
        match self.storage.as_ref().and_then(LocalStore::load) {
            Some(snapshot) => {
                crate::debug!("playground"; "restored snapshot from {}", snapshot.captured_at);
                snapshot.buffers
            }
            None => starter(),
        }
    }

    /// Start the actor on the current tokio runtime and render once.
    pub fn spawn(mut self) -> PlaygroundHandle {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::channel(CHANNEL_BUFFER);

        let store = SourceBufferStore::new(self.opening_buffers());
        let mut actor = PlaygroundActor {
            inbox,
            myself: tx.downgrade(),
            events,
            store,
            scheduler: DebounceScheduler::new(self.debounce),
            builder: DocumentBuilder::new(&self.title),
            host: SandboxHost::new(self.backend, events_tx),
            relay: MessageRelay::new(self.log_capacity),
            metrics: MetricsCollector::new(),
            storage: self.storage,
            autosave: self.autosave,
            load_timeout: self.load_timeout,
            observers: self.observers,
            active: Language::Html,
        };
        actor.connect();

        tokio::spawn(actor.run());
        PlaygroundHandle::new(tx)
    }
}
