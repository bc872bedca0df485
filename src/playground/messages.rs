//! Messages into the playground actor.
//!
//! ```text
//! PlaygroundHandle --Set/Restore/Command/queries--> actor
//! DebounceScheduler --DebounceFired---------------> actor
//! load timer --------LoadTimeout------------------> actor
//! ```

use tokio::sync::oneshot;

use super::Command;
use crate::buffer::{Buffers, Language, Snapshot};
use crate::metrics::Metrics;
use crate::sandbox::{LogEntry, SessionId, SessionStatus};

#[derive(Debug)]
pub enum PlaygroundMsg {
    /// Replace one buffer.
    Set { language: Language, text: String },
    /// Replace all three buffers at once.
    Restore(Buffers),
    Command(Command),

    Snapshot(oneshot::Sender<Snapshot>),
    Logs(oneshot::Sender<Vec<LogEntry>>),
    Metrics(oneshot::Sender<Metrics>),
    Session(oneshot::Sender<Option<(SessionId, SessionStatus)>>),
    ActiveBuffer(oneshot::Sender<Language>),

    /// Quiescence window elapsed after the last edit. Carries the scheduler
    /// generation so a fire overtaken by `Run` is ignored.
    DebounceFired(u64),
    /// The load timeout of a session elapsed.
    LoadTimeout(SessionId),

    /// Tear down the sandbox and stop the actor.
    Dispose,
}
