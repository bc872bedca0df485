//! Execution context backends.
//!
//! A backend turns a preview document into a running, isolated execution
//! context. Everything a context reports flows back through its
//! [`ContextChannel`], which stamps each event with the context identity and
//! session chosen by the host. Sandboxed code never chooses its own origin.
//!
//! ```text
//! SandboxHost --spawn(doc, channel)--> Backend --> ExecutionContext
//!      ^                                                 |
//!      +------------- Envelope { origin, session } ------+
//! ```

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc;

use super::message::SandboxMessage;
use super::session::SessionId;
use crate::preview::PreviewDocument;

/// Identity of one execution context, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// Something that happened inside an execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxEvent {
    /// The document finished loading.
    Loaded,
    /// The document could not be loaded.
    LoadFailed(String),
    /// A message from the instrumentation shim.
    Message(SandboxMessage),
}

/// An event tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub origin: ContextId,
    pub session: SessionId,
    pub event: SandboxEvent,
}

/// Sending half handed to a backend for one context.
#[derive(Debug, Clone)]
pub struct ContextChannel {
    origin: ContextId,
    session: SessionId,
    tx: mpsc::Sender<Envelope>,
}

impl ContextChannel {
    pub(crate) fn new(origin: ContextId, session: SessionId, tx: mpsc::Sender<Envelope>) -> Self {
        Self {
            origin,
            session,
            tx,
        }
    }

    pub fn origin(&self) -> ContextId {
        self.origin
    }

    /// Deliver an event. Returns `false` once the host has gone away.
    pub async fn send(&self, event: SandboxEvent) -> bool {
        self.tx.send(self.envelope(event)).await.is_ok()
    }

    fn envelope(&self, event: SandboxEvent) -> Envelope {
        Envelope {
            origin: self.origin,
            session: self.session,
            event,
        }
    }
}

/// A live execution context. Dropping it tears the context down.
pub trait ExecutionContext: Send {
    fn id(&self) -> ContextId;
}

/// Backend errors.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("no sandbox command configured (set `sandbox.command` in playpen.toml)")]
    NoCommand,

    #[error("failed to start sandbox `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Creates isolated execution contexts.
pub trait SandboxBackend: Send {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Start a fresh context for `document`. Must not block: loading
    /// completes asynchronously and is reported through `channel`.
    fn spawn(
        &mut self,
        document: PreviewDocument,
        channel: ContextChannel,
    ) -> Result<Box<dyn ExecutionContext>, SandboxError>;
}
