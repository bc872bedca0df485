//! Sandbox Message Protocol
//!
//! JSON messages emitted by the sandboxed document (via the instrumentation
//! shim) or by the runner hosting it, one object per message.
//!
//! # Message Types
//!
//! - `console`: `{ "type": "console", "method": "log" | "warn" | "error", "message": "..." }`
//! - `ready`: the document finished loading (runner control message)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::session::{SessionId, SessionStatus};

/// Message crossing the sandbox boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SandboxMessage {
    /// Console call or captured error.
    Console {
        method: ConsoleMethod,
        message: String,
    },
    /// Document load completed.
    Ready,
}

impl SandboxMessage {
    #[cfg(test)]
    pub fn console(method: ConsoleMethod, message: impl Into<String>) -> Self {
        Self::Console {
            method,
            message: message.into(),
        }
    }

    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s.trim()).ok()
    }
}

/// The intercepted console primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Warn,
    Error,
}

impl ConsoleMethod {
    pub const fn severity(self) -> Severity {
        match self {
            Self::Log => Severity::Info,
            Self::Warn => Severity::Warn,
            Self::Error => Severity::Error,
        }
    }
}

// =============================================================================
// Log Entry
// =============================================================================

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Console or error activity, tagged with its originating session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub session_id: SessionId,
    pub severity: Severity,
    pub message: String,
    /// Unix millis at which the host received the entry.
    pub emitted_at: u64,
}

impl LogEntry {
    pub fn new(
        session_id: SessionId,
        severity: Severity,
        message: impl Into<String>,
        emitted_at: u64,
    ) -> Self {
        Self {
            session_id,
            severity,
            message: message.into(),
            emitted_at,
        }
    }
}

// =============================================================================
// Render Completion
// =============================================================================

/// Outcome of a session that reached `Ready` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCompletion {
    pub session: SessionId,
    pub status: SessionStatus,
    pub latency: Option<Duration>,
    /// Reason for a failed load, surfaced as a synthetic error entry.
    pub error: Option<String>,
}
