//! Test backends.
//!
//! - [`ManualBackend`] records channels and never reports on its own; tests
//!   drive events explicitly.
//! - [`ScriptedBackend`] interprets the simplest statements of the user
//!   script (`console.log('..')`, `console.warn(..)`, `console.error(..)`,
//!   `throw new Error('..')`) the way the instrumentation shim reports them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::backend::{
    ContextChannel, ContextId, ExecutionContext, SandboxBackend, SandboxError, SandboxEvent,
};
use super::message::{ConsoleMethod, SandboxMessage};
use crate::preview::PreviewDocument;

/// Shared view of what a test backend has done.
#[derive(Clone, Default)]
pub struct BackendTally {
    pub channels: Arc<Mutex<Vec<ContextChannel>>>,
    pub spawned: Arc<AtomicUsize>,
    pub torn_down: Arc<AtomicUsize>,
}

impl BackendTally {
    pub fn channel(&self, index: usize) -> ContextChannel {
        self.channels.lock()[index].clone()
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    pub fn torn_down(&self) -> usize {
        self.torn_down.load(Ordering::SeqCst)
    }

    fn register(&self, channel: &ContextChannel) -> TestContext {
        self.channels.lock().push(channel.clone());
        self.spawned.fetch_add(1, Ordering::SeqCst);
        TestContext {
            id: channel.origin(),
            torn_down: Arc::clone(&self.torn_down),
        }
    }
}

struct TestContext {
    id: ContextId,
    torn_down: Arc<AtomicUsize>,
}

impl ExecutionContext for TestContext {
    fn id(&self) -> ContextId {
        self.id
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.torn_down.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// ManualBackend
// =============================================================================

#[derive(Default)]
pub struct ManualBackend {
    pub tally: BackendTally,
    pub fail_spawn: bool,
}

impl SandboxBackend for ManualBackend {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn spawn(
        &mut self,
        _document: PreviewDocument,
        channel: ContextChannel,
    ) -> Result<Box<dyn ExecutionContext>, SandboxError> {
        if self.fail_spawn {
            return Err(SandboxError::Spawn {
                program: "manual".into(),
                source: std::io::Error::other("refused"),
            });
        }
        Ok(Box::new(self.tally.register(&channel)))
    }
}

// =============================================================================
// ScriptedBackend
// =============================================================================

#[derive(Default)]
pub struct ScriptedBackend {
    pub tally: BackendTally,
    /// Never report `Loaded` (a hung document).
    pub hold_load: bool,
}

impl SandboxBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn spawn(
        &mut self,
        document: PreviewDocument,
        channel: ContextChannel,
    ) -> Result<Box<dyn ExecutionContext>, SandboxError> {
        let context = self.tally.register(&channel);
        let messages = interpret(document.user_script());
        let hold_load = self.hold_load;

        tokio::spawn(async move {
            for message in messages {
                if !channel.send(SandboxEvent::Message(message)).await {
                    return;
                }
            }
            if !hold_load {
                channel.send(SandboxEvent::Loaded).await;
            }
        });

        Ok(Box::new(context))
    }
}

/// Messages the shim would emit for a trivial script.
pub fn interpret(script: &str) -> Vec<SandboxMessage> {
    let mut messages = Vec::new();
    for statement in script.split([';', '\n']).map(str::trim) {
        if let Some((method, argument)) = console_call(statement) {
            messages.push(SandboxMessage::console(method, argument));
        } else if let Some(text) = call_argument(statement, "throw new Error") {
            // The guard block reports `name: message` and stops the script.
            messages.push(SandboxMessage::console(
                ConsoleMethod::Error,
                format!("Error: {text}"),
            ));
            break;
        }
    }
    messages
}

fn console_call(statement: &str) -> Option<(ConsoleMethod, String)> {
    let rest = statement.strip_prefix("console.")?;
    let (method, prefix) = [
        (ConsoleMethod::Log, "log"),
        (ConsoleMethod::Warn, "warn"),
        (ConsoleMethod::Error, "error"),
    ]
    .into_iter()
    .find(|(_, name)| rest.starts_with(&format!("{name}(")))?;
    call_argument(rest, prefix).map(|text| (method, text))
}

fn call_argument(statement: &str, callee: &str) -> Option<String> {
    let inner = statement
        .strip_prefix(callee)?
        .strip_prefix('(')?
        .strip_suffix(')')?
        .trim();
    let quote = inner.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    inner
        .strip_prefix(quote)?
        .strip_suffix(quote)
        .map(str::to_string)
}

#[test]
fn test_interpret_statements() {
    assert_eq!(
        interpret("console.log('x'); console.warn(\"y\")\nthrow new Error('boom'); console.log('z')"),
        vec![
            SandboxMessage::console(ConsoleMethod::Log, "x"),
            SandboxMessage::console(ConsoleMethod::Warn, "y"),
            SandboxMessage::console(ConsoleMethod::Error, "Error: boom"),
        ]
    );
    assert!(interpret("let a = 1").is_empty());
}
