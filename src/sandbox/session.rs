//! Render sessions.
//!
//! ```text
//! Pending -> Loading -> Ready
//!                   \-> Failed
//! (any) -> Superseded          (terminal, newer session created)
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Monotonic render session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a render session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Loading,
    Ready,
    Failed,
    Superseded,
}

impl SessionStatus {
    /// No further transitions are possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed | Self::Superseded)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Superseded => "superseded",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One render attempt.
#[derive(Debug, Clone)]
pub struct RenderSession {
    id: SessionId,
    status: SessionStatus,
    /// Monotonic start, for latency.
    started: Instant,
    latency: Option<Duration>,
}

impl RenderSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            status: SessionStatus::Pending,
            started: Instant::now(),
            latency: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Load latency, once the session is `Ready`.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    /// `Pending -> Loading`.
    pub fn begin_loading(&mut self) -> bool {
        self.transition(SessionStatus::Pending, SessionStatus::Loading)
    }

    /// `Loading -> Ready`, recording latency.
    pub fn mark_ready(&mut self) -> bool {
        if self.transition(SessionStatus::Loading, SessionStatus::Ready) {
            self.latency = Some(self.started.elapsed());
            true
        } else {
            false
        }
    }

    /// `Pending | Loading -> Failed`.
    pub fn mark_failed(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = SessionStatus::Failed;
        true
    }

    /// Any state -> `Superseded`.
    pub fn supersede(&mut self) {
        self.status = SessionStatus::Superseded;
    }

    fn transition(&mut self, from: SessionStatus, to: SessionStatus) -> bool {
        if self.status == from {
            self.status = to;
            true
        } else {
            false
        }
    }
}
