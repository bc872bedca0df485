//! Command-line interface module.

mod args;
pub mod build;
pub mod observer;
pub mod render;
pub mod share;
pub mod sources;
pub mod store;
pub mod watch;

pub use args::{Cli, Commands, ShareAction, SourceArgs};

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use crate::config::PlaypenConfig;
use crate::sandbox::ProcessBackend;

/// Runtime for commands that drive a playground.
fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

/// Backend running the `[sandbox] command` runner, or the embedded node
/// runner when none is configured. Children start in the config directory.
fn process_backend(config: &PlaypenConfig) -> ProcessBackend {
    let backend = if config.sandbox.command.is_empty() {
        crate::debug!("sandbox"; "no command configured, using the embedded node runner");
        ProcessBackend::node()
    } else {
        ProcessBackend::new(config.sandbox.command.clone())
    };
    if config.root.as_os_str().is_empty() {
        backend
    } else {
        backend.with_working_dir(&config.root)
    }
}
