//! `playpen watch`: live preview of three source files.
//!
//! ```text
//! notify thread --paths----> select loop --set------> playground
//! stdin thread  --Command--> select loop --command--> playground
//! Ctrl+C        --dispose-------------------------> playground
//! ```
//!
//! Editors often touch or rewrite files without changing them, so each
//! event is checked against a blake3 digest of the last content sent.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, anyhow};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use tokio::sync::mpsc;

use super::observer::TerminalObserver;
use super::sources::read_source;
use super::{SourceArgs, process_backend, runtime};
use crate::buffer::{Buffers, Language};
use crate::config::PlaypenConfig;
use crate::playground::{Command, Playground, PlaygroundHandle};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Changed-path channel buffer size
const CHANGE_BUFFER: usize = 64;

/// Stdin command channel buffer size
const COMMAND_BUFFER: usize = 16;

pub fn watch_sources(config: &PlaypenConfig, sources: &SourceArgs) -> Result<()> {
    let files = WatchedFiles::resolve(sources)?;
    if files.is_empty() {
        return Err(anyhow!("nothing to watch; pass --html, --css or --js"));
    }
    let initial = sources.read()?;
    let backend = process_backend(config);

    runtime()?.block_on(async move {
        let handle = Playground::new(Box::new(backend))
            .with_config(config)
            .with_buffers(initial.clone())
            .with_observer(TerminalObserver)
            .spawn();

        let shutdown = handle.clone();
        ctrlc::set_handler(move || {
            log!("watch"; "shutting down...");
            shutdown.dispose();
        })
        .map_err(|e| anyhow!("failed to set Ctrl+C handler: {}", e))?;

        let (changes_tx, changes) = mpsc::channel(CHANGE_BUFFER);
        let _watcher = spawn_watcher(&files, changes_tx)?;
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        spawn_command_reader(commands_tx);

        log!("watch"; "watching {}", plural_count(files.len(), "file"));
        let inputs = Inputs { changes, commands };
        run(handle, files, Digests::new(&initial), inputs).await;
        Ok::<_, anyhow::Error>(())
    })
}

/// What the select loop listens to besides the playground itself.
struct Inputs {
    changes: mpsc::Receiver<PathBuf>,
    commands: mpsc::Receiver<Command>,
}

async fn run(handle: PlaygroundHandle, files: WatchedFiles, mut digests: Digests, mut inputs: Inputs) {
    loop {
        tokio::select! {
            () = handle.closed() => break,
            Some(command) = inputs.commands.recv() => {
                let switched = matches!(command, Command::SwitchBuffer(_));
                if !handle.command(command) {
                    break;
                }
                if switched && let Some(language) = handle.active_buffer().await {
                    log!("watch"; "editing {}", language.label());
                }
            }
            Some(path) = inputs.changes.recv() => {
                let Some((language, source)) = files.find(&path) else {
                    continue;
                };
                let text = match read_source(source) {
                    Ok(text) => text,
                    Err(e) => {
                        debug!("watch"; "{:#}", e);
                        continue;
                    }
                };
                if digests.update(language, &text) {
                    debug!("watch"; "{} changed", source.display());
                    handle.set(language, text);
                } else {
                    debug!("watch"; "{} unchanged", source.display());
                }
            }
        }
    }
}

// =============================================================================
// Watched files
// =============================================================================

/// Canonical source paths, so notify's event paths compare equal.
struct WatchedFiles {
    files: Vec<(Language, PathBuf)>,
}

impl WatchedFiles {
    fn resolve(sources: &SourceArgs) -> Result<Self> {
        let files = sources
            .files()
            .map(|(language, path)| {
                path.canonicalize()
                    .with_context(|| format!("Failed to resolve {}", path.display()))
                    .map(|path| (language, path))
            })
            .collect::<Result<_>>()?;
        Ok(Self { files })
    }

    fn len(&self) -> usize {
        self.files.len()
    }

    fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn find(&self, path: &Path) -> Option<(Language, &Path)> {
        self.files
            .iter()
            .find(|(_, source)| source == path)
            .map(|(language, source)| (*language, source.as_path()))
    }

    /// Parent directories, watched instead of the files themselves so
    /// replace-on-save editors keep being observed.
    fn dirs(&self) -> FxHashSet<&Path> {
        self.files.iter().filter_map(|(_, path)| path.parent()).collect()
    }
}

fn spawn_watcher(
    files: &WatchedFiles,
    changes: mpsc::Sender<PathBuf>,
) -> Result<RecommendedWatcher> {
    // notify calls back on its own thread; bridge through a std channel.
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .context("Failed to create file watcher")?;

    for dir in files.dirs() {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
    }

    thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            let event: notify::Event = match result {
                Ok(event) => event,
                Err(e) => {
                    log!("watch"; "notify error: {}", e);
                    continue;
                }
            };
            if event.kind.is_access() {
                continue;
            }
            for path in event.paths {
                if changes.blocking_send(path).is_err() {
                    return;
                }
            }
        }
    });

    Ok(watcher)
}

/// Parse stdin lines into commands for the select loop.
fn spawn_command_reader(commands: mpsc::Sender<Command>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if commands.blocking_send(command).is_err() {
                        break;
                    }
                }
                Err(e) => log!("watch"; "{}", e),
            }
        }
    });
}

// =============================================================================
// Digests
// =============================================================================

/// Last content digest sent per buffer.
struct Digests {
    last: [blake3::Hash; 3],
}

impl Digests {
    fn new(buffers: &Buffers) -> Self {
        Self {
            last: Language::ALL.map(|language| blake3::hash(buffers.get(language).as_bytes())),
        }
    }

    /// Record `text` and report whether it differs from the last content.
    fn update(&mut self, language: Language, text: &str) -> bool {
        let digest = blake3::hash(text.as_bytes());
        let slot = &mut self.last[language.index()];
        if *slot == digest {
            false
        } else {
            *slot = digest;
            true
        }
    }
}
