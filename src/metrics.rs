//! Display-facing counters: buffer sizes, render latency, dropped messages.
//!
//! Nothing in here fails. The collector is a plain value owned by the
//! playground actor, and [`Metrics`] snapshots are handed to observers.

use std::time::Duration;

use serde::Serialize;

use crate::buffer::{Buffers, Language};

/// Line and byte totals across the three buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BufferMetrics {
    pub total_lines: usize,
    pub total_bytes: usize,
}

impl BufferMetrics {
    pub fn measure(buffers: &Buffers) -> Self {
        Language::ALL
            .iter()
            .map(|&language| buffers.get(language))
            .fold(Self::default(), |acc, text| Self {
                total_lines: acc.total_lines + line_count(text),
                total_bytes: acc.total_bytes + text.len(),
            })
    }
}

/// Empty text has no lines; otherwise every newline starts another one.
fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.bytes().filter(|&b| b == b'\n').count() + 1
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub buffers: BufferMetrics,
    pub last_render_latency_ms: Option<u64>,
    pub renders: u64,
    pub dropped_messages: u64,
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    current: Metrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recount buffer totals.
    pub fn measure(&mut self, buffers: &Buffers) -> BufferMetrics {
        self.current.buffers = BufferMetrics::measure(buffers);
        self.current.buffers
    }

    pub fn record_render_latency(&mut self, latency: Duration) {
        self.current.last_render_latency_ms = Some(latency.as_millis() as u64);
    }

    pub fn record_render(&mut self) {
        self.current.renders += 1;
    }

    pub fn record_dropped(&mut self) {
        self.current.dropped_messages += 1;
    }

    pub fn snapshot(&self) -> Metrics {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\n"), 2);
        assert_eq!(line_count("a\nb\nc"), 3);
    }

    #[test]
    fn test_measure_totals_all_buffers() {
        let buffers = Buffers::new("<p>\nhi\n</p>", "", "é");
        let metrics = BufferMetrics::measure(&buffers);
        assert_eq!(metrics.total_lines, 4);
        assert_eq!(metrics.total_bytes, 11 + 2);
    }

    #[test]
    fn test_collector_snapshot() {
        let mut collector = MetricsCollector::new();
        assert_eq!(collector.snapshot(), Metrics::default());

        collector.measure(&Buffers::new("a", "b", "c"));
        collector.record_render();
        collector.record_render();
        collector.record_render_latency(Duration::from_millis(42));
        collector.record_dropped();

        let metrics = collector.snapshot();
        assert_eq!(metrics.buffers.total_lines, 3);
        assert_eq!(metrics.renders, 2);
        assert_eq!(metrics.last_render_latency_ms, Some(42));
        assert_eq!(metrics.dropped_messages, 1);
    }
}
