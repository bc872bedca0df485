//! Outward interface of a playground.

use crate::metrics::Metrics;
use crate::sandbox::{LogEntry, SessionId, SessionStatus};

/// Receives playground events on the actor task.
///
/// Every method defaults to doing nothing. Implementations should return
/// quickly; they run inside the event loop.
pub trait Observer: Send + Sync {
    /// A session reached `Ready` or `Failed`.
    fn on_render_complete(&self, _session: SessionId, _status: SessionStatus) {}

    /// An entry was accepted into the visible log.
    fn on_log_entry(&self, _entry: &LogEntry) {}

    fn on_metrics_update(&self, _metrics: &Metrics) {}
}
