//! Message relay.
//!
//! Turns inbound sandbox messages into [`LogEntry`]s for the host. A message
//! is accepted only if
//!
//! 1. its origin is the context the host currently owns, and
//! 2. its session is the host's current session.
//!
//! Everything else is dropped without surfacing (and counted). Accepted
//! entries go into a bounded log that evicts oldest-first, then to every
//! registered handler in arrival order.

use std::collections::VecDeque;

use super::backend::ContextId;
use super::host::{Rejection, SandboxHost};
use super::message::{LogEntry, SandboxMessage, Severity};
use super::session::SessionId;
use crate::utils::time::now_millis;

/// Default visible log capacity.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

type Handler = Box<dyn FnMut(&LogEntry) + Send>;

/// Bounded, session-filtered console log.
pub struct MessageRelay {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    handlers: Vec<Handler>,
    dropped: u64,
}

impl MessageRelay {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            handlers: Vec::new(),
            dropped: 0,
        }
    }

    /// Register a handler for accepted entries.
    pub fn on_message(&mut self, handler: impl FnMut(&LogEntry) + Send + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Validate and record a message from the sandbox.
    pub fn receive(
        &mut self,
        host: &SandboxHost,
        origin: ContextId,
        session: SessionId,
        message: SandboxMessage,
    ) -> Option<LogEntry> {
        if let Err(reason) = host.verify(origin, session) {
            self.dropped += 1;
            match reason {
                Rejection::ForeignOrigin => {
                    crate::debug!("relay"; "dropped message from foreign {}", origin)
                }
                Rejection::StaleSession => {
                    crate::debug!("relay"; "dropped message from stale session {}", session)
                }
            }
            return None;
        }

        let SandboxMessage::Console { method, message } = message else {
            return None;
        };
        let entry = LogEntry::new(session, method.severity(), message, now_millis());
        self.record(entry.clone());
        Some(entry)
    }

    /// Append a host-originated entry (e.g. a failed load).
    pub fn record(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        for handler in &mut self.handlers {
            handler(&entry);
        }
        self.entries.push_back(entry);
    }

    /// Convenience for synthetic error entries.
    pub fn record_error(&mut self, session: SessionId, message: impl Into<String>) {
        self.record(LogEntry::new(session, Severity::Error, message, now_millis()));
    }

    /// Visible entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of messages dropped by origin/session checks.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
