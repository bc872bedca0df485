//! Sandbox execution host.
//!
//! Owns at most one live execution context. Every render gets a fresh
//! context and a new session id; the previous session is superseded the
//! moment the new one is created, before its own load has finished.
//!
//! Load outcomes are queued as [`RenderCompletion`]s and drained by the
//! owner with [`SandboxHost::drain_completions`].

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;

use super::backend::{ContextChannel, ContextId, Envelope, ExecutionContext, SandboxBackend};
use super::message::RenderCompletion;
use super::session::{RenderSession, SessionId, SessionStatus};
use crate::preview::PreviewDocument;

/// Why an inbound envelope was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not the currently owned context (stale, foreign, or spoofed).
    ForeignOrigin,
    /// Right context, but tagged with a session that is no longer current.
    StaleSession,
}

/// Creates, owns and tears down execution contexts.
pub struct SandboxHost {
    backend: Box<dyn SandboxBackend>,
    events: mpsc::Sender<Envelope>,
    next_session: u64,
    next_context: u64,
    session: Option<RenderSession>,
    context: Option<Box<dyn ExecutionContext>>,
    /// Identity of `context`, kept even if spawning failed so late events
    /// from the previous context still mismatch.
    live: Option<ContextId>,
    completions: VecDeque<RenderCompletion>,
    disposed: bool,
}

impl SandboxHost {
    /// `events` is the channel every context reports into.
    pub fn new(backend: Box<dyn SandboxBackend>, events: mpsc::Sender<Envelope>) -> Self {
        Self {
            backend,
            events,
            next_session: 1,
            next_context: 1,
            session: None,
            context: None,
            live: None,
            completions: VecDeque::new(),
            disposed: false,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Start rendering `document` in a fresh context.
    ///
    /// Returns immediately; the load outcome arrives later as an event.
    pub fn render(&mut self, document: PreviewDocument) -> SessionId {
        let id = SessionId::new(self.next_session);
        self.next_session += 1;

        self.teardown();

        let mut session = RenderSession::new(id);
        if self.disposed {
            session.supersede();
            self.session = Some(session);
            return id;
        }

        let origin = ContextId::new(self.next_context);
        self.next_context += 1;
        self.live = Some(origin);

        let channel = ContextChannel::new(origin, id, self.events.clone());
        match self.backend.spawn(document, channel) {
            Ok(context) => {
                session.begin_loading();
                crate::debug!("sandbox"; "session {} loading in {}", id, context.id());
                self.context = Some(context);
            }
            Err(e) => {
                session.mark_failed();
                self.completions.push_back(RenderCompletion {
                    session: id,
                    status: SessionStatus::Failed,
                    latency: None,
                    error: Some(e.to_string()),
                });
                crate::debug!("sandbox"; "session {} failed to start: {}", id, e);
            }
        }

        self.session = Some(session);
        id
    }

    /// Check that an envelope comes from the live context and session.
    pub fn verify(&self, origin: ContextId, session: SessionId) -> Result<(), Rejection> {
        if self.disposed || self.live != Some(origin) || self.context.is_none() {
            return Err(Rejection::ForeignOrigin);
        }
        match &self.session {
            Some(current) if current.id() == session && current.status() != SessionStatus::Superseded => {
                Ok(())
            }
            _ => Err(Rejection::StaleSession),
        }
    }

    /// Record a load outcome reported by a context. Ignored unless it comes
    /// from the live context and current session.
    pub fn complete_load(
        &mut self,
        origin: ContextId,
        session: SessionId,
        outcome: Result<(), String>,
    ) -> bool {
        if let Err(reason) = self.verify(origin, session) {
            crate::debug!("sandbox"; "ignored load event from {} for {}: {:?}", origin, session, reason);
            return false;
        }
        let Some(current) = self.session.as_mut() else {
            return false;
        };

        let completion = match outcome {
            Ok(()) if current.mark_ready() => RenderCompletion {
                session,
                status: SessionStatus::Ready,
                latency: current.latency(),
                error: None,
            },
            Err(error) if current.mark_failed() => RenderCompletion {
                session,
                status: SessionStatus::Failed,
                latency: None,
                error: Some(error),
            },
            // Duplicate or out-of-order load event.
            _ => return false,
        };
        self.completions.push_back(completion);
        true
    }

    /// Fail the session if it is still loading (load timeout).
    pub fn expire(&mut self, session: SessionId, after: Duration) -> bool {
        let Some(current) = self.session.as_mut() else {
            return false;
        };
        if current.id() != session || current.status() != SessionStatus::Loading {
            return false;
        }
        current.mark_failed();
        self.completions.push_back(RenderCompletion {
            session,
            status: SessionStatus::Failed,
            latency: None,
            error: Some(format!("sandbox load timed out after {} ms", after.as_millis())),
        });
        self.teardown_context();
        true
    }

    /// Take all queued completions, oldest first.
    pub fn drain_completions(&mut self) -> Vec<RenderCompletion> {
        self.completions.drain(..).collect()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(RenderSession::id)
    }

    /// Identity of the live context, if any.
    #[cfg(test)]
    pub fn live_context(&self) -> Option<ContextId> {
        self.context.as_ref().and(self.live)
    }

    /// Status of any session ever created by this host.
    ///
    /// Every session older than the current one is superseded.
    pub fn status_of(&self, id: SessionId) -> Option<SessionStatus> {
        let current = self.session.as_ref()?;
        if id == current.id() {
            Some(current.status())
        } else if id < current.id() && id.get() >= 1 {
            Some(SessionStatus::Superseded)
        } else {
            None
        }
    }

    /// Tear down the live context; later events are ignored.
    pub fn dispose(&mut self) {
        self.teardown();
        self.disposed = true;
        self.completions.clear();
    }

    fn teardown(&mut self) {
        if let Some(previous) = self.session.as_mut()
            && previous.status() != SessionStatus::Superseded
        {
            crate::debug!("sandbox"; "session {} superseded ({})", previous.id(), previous.status());
            previous.supersede();
        }
        self.teardown_context();
    }

    fn teardown_context(&mut self) {
        // Dropping the context is the teardown.
        self.context = None;
    }
}
