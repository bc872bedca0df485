//! `playpen render`: one render, its console output, and its outcome.

use anyhow::{Result, bail};

use super::observer::{CompletionSignal, TerminalObserver};
use super::{SourceArgs, process_backend, runtime};
use crate::buffer::Buffers;
use crate::config::PlaypenConfig;
use crate::log;
use crate::playground::Playground;
use crate::sandbox::SessionStatus;
use crate::utils::plural::plural_count;
use crate::utils::time::format_duration;

/// Render once and fail unless the session reaches `Ready`.
pub fn render_once(config: &PlaypenConfig, sources: &SourceArgs, share: Option<&str>) -> Result<()> {
    let buffers = match share {
        Some(input) => super::share::decode_input(input, &config.share.param)?,
        None => sources.read()?,
    };
    let backend = process_backend(config);
    runtime()?.block_on(render(config, buffers, backend))
}

async fn render(
    config: &PlaypenConfig,
    buffers: Buffers,
    backend: crate::sandbox::ProcessBackend,
) -> Result<()> {
    let (signal, mut completions) = CompletionSignal::new();
    let handle = Playground::new(Box::new(backend))
        .with_config(config)
        .with_buffers(buffers)
        .with_observer(TerminalObserver)
        .with_observer(signal)
        .spawn();

    let outcome = completions.recv().await;
    let logs = handle.logs().await;
    let metrics = handle.metrics().await;
    handle.dispose();
    handle.closed().await;

    match outcome {
        Some((session, SessionStatus::Ready)) => {
            let latency = metrics
                .and_then(|m| m.last_render_latency_ms)
                .map(|ms| format_duration(std::time::Duration::from_millis(ms)))
                .unwrap_or_else(|| "-".to_string());
            log!("render"; "{} ready in {}, {}", session, latency, plural_count(logs.len(), "message"));
            Ok(())
        }
        Some((session, status)) => bail!("render {session} {status}"),
        None => bail!("playground stopped before the render completed"),
    }
}
