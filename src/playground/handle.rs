//! Cloneable front door to a running playground.

use tokio::sync::{mpsc, oneshot};

use super::Command;
use super::messages::PlaygroundMsg;
use crate::buffer::{Buffers, Language, Snapshot};
use crate::metrics::Metrics;
use crate::sandbox::{LogEntry, SessionId, SessionStatus};

/// Send-only access to the playground actor.
///
/// Writes return `false` once the playground has stopped; queries return
/// `None` (or an empty log).
#[derive(Clone)]
pub struct PlaygroundHandle {
    tx: mpsc::UnboundedSender<PlaygroundMsg>,
}

impl PlaygroundHandle {
    pub(super) fn new(tx: mpsc::UnboundedSender<PlaygroundMsg>) -> Self {
        Self { tx }
    }

    pub fn set(&self, language: Language, text: impl Into<String>) -> bool {
        self.send(PlaygroundMsg::Set {
            language,
            text: text.into(),
        })
    }

    pub fn restore(&self, buffers: Buffers) -> bool {
        self.send(PlaygroundMsg::Restore(buffers))
    }

    pub fn command(&self, command: Command) -> bool {
        self.send(PlaygroundMsg::Command(command))
    }

    /// Stop the playground. Pending renders are discarded.
    pub fn dispose(&self) -> bool {
        self.send(PlaygroundMsg::Dispose)
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.ask(PlaygroundMsg::Snapshot).await
    }

    pub async fn logs(&self) -> Vec<LogEntry> {
        self.ask(PlaygroundMsg::Logs).await.unwrap_or_default()
    }

    pub async fn metrics(&self) -> Option<Metrics> {
        self.ask(PlaygroundMsg::Metrics).await
    }

    /// Current session and its status, if any render has started.
    pub async fn session(&self) -> Option<(SessionId, SessionStatus)> {
        self.ask(PlaygroundMsg::Session).await.flatten()
    }

    pub async fn active_buffer(&self) -> Option<Language> {
        self.ask(PlaygroundMsg::ActiveBuffer).await
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the actor has stopped.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }

    fn send(&self, msg: PlaygroundMsg) -> bool {
        self.tx.send(msg).is_ok()
    }

    /// Queue an internal message, as a timer would.
    #[cfg(test)]
    pub(super) fn inject(&self, msg: PlaygroundMsg) -> bool {
        self.send(msg)
    }

    async fn ask<T>(&self, request: impl FnOnce(oneshot::Sender<T>) -> PlaygroundMsg) -> Option<T> {
        let (reply, rx) = oneshot::channel();
        if !self.send(request(reply)) {
            return None;
        }
        rx.await.ok()
    }
}
