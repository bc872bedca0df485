//! `playpen save` / `playpen restore`.

use std::path::Path;

use anyhow::{Result, bail};

use super::SourceArgs;
use super::sources::emit_buffers;
use crate::buffer::Snapshot;
use crate::config::PlaypenConfig;
use crate::log;
use crate::persist::LocalStore;

pub fn save_snapshot(config: &PlaypenConfig, sources: &SourceArgs) -> Result<()> {
    let store = LocalStore::from_config(&config.storage);
    store.save(&Snapshot::now(sources.read()?))?;
    log!("save"; "saved to {}", store.path().display());
    Ok(())
}

pub fn restore_snapshot(config: &PlaypenConfig, output: Option<&Path>) -> Result<()> {
    let store = LocalStore::from_config(&config.storage);
    let Some(snapshot) = store.load() else {
        bail!(
            "no saved snapshot younger than {} hours at {}",
            config.storage.validity_hours,
            store.path().display()
        );
    };
    emit_buffers(output, &snapshot.buffers)
}
