//! Sandbox Module
//!
//! Isolated execution of preview documents and the message boundary back
//! to the host.
//!
//! # Architecture
//!
//! ```text
//! SandboxHost --spawn--> Backend --> ExecutionContext (fresh per render)
//!      |                                    |
//!   verify(origin, session) <-- Envelope ---+
//!      |
//! MessageRelay --> bounded log --> handlers
//! ```
//!
//! # Modules
//!
//! - `backend` - Backend trait, context identity and event envelopes
//! - `host` - Session allocation, supersession and context ownership
//! - `message` - Wire protocol and log entry types
//! - `process` - Child-process backend
//! - `relay` - Origin/session filtering and the bounded log
//! - `session` - Render session state machine

pub mod backend;
pub mod host;
pub mod message;
pub mod process;
pub mod relay;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use backend::{Envelope, SandboxBackend, SandboxEvent};
pub use host::SandboxHost;
pub use message::{LogEntry, Severity};
pub use process::ProcessBackend;
pub use relay::{DEFAULT_LOG_CAPACITY, MessageRelay};
pub use session::{SessionId, SessionStatus};
