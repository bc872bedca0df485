//! Child-process execution contexts.
//!
//! Every render runs the configured command as a fresh child process:
//!
//! 1. the preview document is written to the child's stdin, then stdin closes
//! 2. each stdout line that parses as a [`SandboxMessage`] is forwarded
//! 3. a `{"type":"ready"}` line, or a successful exit, completes the load
//! 4. a non-zero exit before `ready` fails the load
//!
//! Dropping the context aborts the driver task, which drops the child and
//! kills it (`kill_on_drop`).
//!
//! # Runner contract
//!
//! The runner must define `window.__playpenBridge(json)` before the shim
//! runs, print every string it receives as one stdout line, and print
//! `{"type":"ready"}` once the document's scripts have run. A node
//! implementation is embedded as [`NODE_RUNNER`] and used when no command is
//! configured ([`ProcessBackend::node`]).

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;

use super::backend::{
    ContextChannel, ContextId, ExecutionContext, SandboxBackend, SandboxError, SandboxEvent,
};
use super::message::SandboxMessage;
use crate::preview::PreviewDocument;

/// Embedded node runner (`node -e NODE_RUNNER`).
pub const NODE_RUNNER: &str = include_str!("runner.js");

/// Runs each document in a new child process.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessBackend {
    /// `command[0]` is the program, the rest are its arguments.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            working_dir: None,
        }
    }

    /// The embedded runner on the `node` found in `PATH`.
    pub fn node() -> Self {
        Self::new(vec!["node".into(), "-e".into(), NODE_RUNNER.into()])
    }

    /// Run children in `dir`, so relative runner paths resolve there.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl SandboxBackend for ProcessBackend {
    fn name(&self) -> &'static str {
        "process"
    }

    fn spawn(
        &mut self,
        document: PreviewDocument,
        channel: ContextChannel,
    ) -> Result<Box<dyn ExecutionContext>, SandboxError> {
        let (program, args) = self.command.split_first().ok_or(SandboxError::NoCommand)?;

        let mut command = Command::new(program);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let mut child = command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let id = channel.origin();
        crate::debug!(
            "sandbox";
            "{} started pid {:?} ({} bytes, shim {}, script {})",
            id,
            child.id(),
            document.as_str().len(),
            document.shim_range().len(),
            document.script_range().len()
        );

        let task = tokio::spawn(drive(child, stdin, stdout, document, channel));
        Ok(Box::new(ProcessContext { id, task }))
    }
}

/// Handle to a running child. The child dies with it.
struct ProcessContext {
    id: ContextId,
    task: JoinHandle<()>,
}

impl ExecutionContext for ProcessContext {
    fn id(&self) -> ContextId {
        self.id
    }
}

impl Drop for ProcessContext {
    fn drop(&mut self) {
        self.task.abort();
        crate::debug!("sandbox"; "{} torn down", self.id);
    }
}

async fn drive(
    mut child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    document: PreviewDocument,
    channel: ContextChannel,
) {
    // Feed and read concurrently so a chatty runner cannot stall on a full pipe.
    let origin = channel.origin();
    let feed = async move {
        if let Some(mut stdin) = stdin {
            // A runner may exit without reading everything; its exit status decides.
            if let Err(e) = stdin.write_all(document.as_str().as_bytes()).await {
                crate::debug!("sandbox"; "{} stdin: {}", origin, e);
            }
        }
    };
    let ((), outcome) = tokio::join!(feed, read_output(stdout, &channel));

    let loaded = match outcome {
        ReadOutcome::HostGone => return,
        ReadOutcome::Loaded => true,
        ReadOutcome::Eof => false,
    };

    let status = child.wait().await;
    if loaded {
        return;
    }

    let event = match status {
        Ok(status) if status.success() => SandboxEvent::Loaded,
        Ok(status) => SandboxEvent::LoadFailed(format!("sandbox exited with {status}")),
        Err(e) => SandboxEvent::LoadFailed(format!("sandbox wait failed: {e}")),
    };
    channel.send(event).await;
}

enum ReadOutcome {
    /// Output ended after a `ready` message.
    Loaded,
    /// Output ended without `ready`.
    Eof,
    /// The host dropped its receiver.
    HostGone,
}

async fn read_output(stdout: Option<ChildStdout>, channel: &ContextChannel) -> ReadOutcome {
    let Some(stdout) = stdout else {
        return ReadOutcome::Eof;
    };

    let mut loaded = false;
    let mut lines = BufReader::new(stdout).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                crate::debug!("sandbox"; "{} stdout: {}", channel.origin(), e);
                break;
            }
        };

        let event = match SandboxMessage::from_json(&line) {
            Some(SandboxMessage::Ready) if loaded => continue,
            Some(SandboxMessage::Ready) => {
                loaded = true;
                SandboxEvent::Loaded
            }
            Some(message) => SandboxEvent::Message(message),
            None => {
                crate::debug!("sandbox"; "{} ignored line: {}", channel.origin(), line);
                continue;
            }
        };

        if !channel.send(event).await {
            return ReadOutcome::HostGone;
        }
    }

    if loaded {
        ReadOutcome::Loaded
    } else {
        ReadOutcome::Eof
    }
}

// =============================================================================
// Tests
// =============================================================================
