//! Terminal presentation of playground events.

use owo_colors::Style;
use tokio::sync::mpsc;

use crate::logger::{paint, status_failed, status_pending, status_ready};
use crate::metrics::Metrics;
use crate::playground::Observer;
use crate::sandbox::{LogEntry, SessionId, SessionStatus, Severity};
use crate::utils::plural::plural_count;

/// Prints log entries and the render status line.
pub struct TerminalObserver;

impl Observer for TerminalObserver {
    fn on_render_complete(&self, session: SessionId, status: SessionStatus) {
        match status {
            SessionStatus::Ready => status_ready(&format!("{session} rendered")),
            SessionStatus::Failed => status_failed(&format!("{session} failed"), ""),
            other => status_pending(&format!("{session} {other}")),
        }
    }

    fn on_log_entry(&self, entry: &LogEntry) {
        crate::log!("console"; "{}", format_entry(entry));
    }

    fn on_metrics_update(&self, metrics: &Metrics) {
        crate::debug!(
            "metrics";
            "{}, {} bytes, {} rendered, {} dropped",
            plural_count(metrics.buffers.total_lines, "line"),
            metrics.buffers.total_bytes,
            metrics.renders,
            metrics.dropped_messages
        );
    }
}

/// `warn careful` with the severity colored.
pub fn format_entry(entry: &LogEntry) -> String {
    let style = match entry.severity {
        Severity::Info => Style::new().dimmed(),
        Severity::Warn => Style::new().yellow(),
        Severity::Error => Style::new().red().bold(),
    };
    format!("{} {}", paint(entry.severity, style), entry.message)
}

/// Forwards render completions to a channel so a command can wait on them.
pub struct CompletionSignal {
    tx: mpsc::UnboundedSender<(SessionId, SessionStatus)>,
}

impl CompletionSignal {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(SessionId, SessionStatus)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Observer for CompletionSignal {
    fn on_render_complete(&self, session: SessionId, status: SessionStatus) {
        let _ = self.tx.send((session, status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry() {
        owo_colors::set_override(false);
        let entry = LogEntry::new(SessionId::new(1), Severity::Warn, "careful", 0);
        assert_eq!(format_entry(&entry), "warn careful");
    }
}
