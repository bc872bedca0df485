use std::time::Duration;

use tokio::sync::mpsc;

use super::backend::{ContextId, Envelope, SandboxEvent};
use super::host::{Rejection, SandboxHost};
use super::message::{ConsoleMethod, SandboxMessage, Severity};
use super::relay::MessageRelay;
use super::session::{SessionId, SessionStatus};
use super::testing::{BackendTally, ManualBackend, ScriptedBackend};
use crate::preview::build;

fn manual_host() -> (SandboxHost, BackendTally, mpsc::Receiver<Envelope>) {
    let backend = ManualBackend::default();
    let tally = backend.tally.clone();
    let (tx, rx) = mpsc::channel(64);
    (SandboxHost::new(Box::new(backend), tx), tally, rx)
}

fn log(message: &str) -> SandboxMessage {
    SandboxMessage::console(ConsoleMethod::Log, message)
}

fn deliver(host: &mut SandboxHost, relay: &mut MessageRelay, envelope: Envelope) {
    match envelope.event {
        SandboxEvent::Message(message) => {
            relay.receive(host, envelope.origin, envelope.session, message);
        }
        SandboxEvent::Loaded => {
            host.complete_load(envelope.origin, envelope.session, Ok(()));
        }
        SandboxEvent::LoadFailed(reason) => {
            host.complete_load(envelope.origin, envelope.session, Err(reason));
        }
    }
    for completion in host.drain_completions() {
        if let Some(error) = completion.error {
            relay.record_error(completion.session, error);
        }
    }
}

// ----------------------------------------------------------------------------
// Host lifecycle
// ----------------------------------------------------------------------------

#[test]
fn test_no_session_before_first_render() {
    let (host, _, _) = manual_host();
    assert_eq!(host.current_session(), None);
    assert_eq!(host.live_context(), None);
}

#[test]
fn test_session_ids_are_monotonic() {
    let (mut host, tally, _) = manual_host();
    let a = host.render(build("", "", ""));
    let b = host.render(build("", "", ""));
    let c = host.render(build("", "", ""));

    assert!(a < b && b < c);
    assert_eq!(tally.spawned(), 3);
    // Every superseded render had its context torn down.
    assert_eq!(tally.torn_down(), 2);
}

#[test]
fn test_render_supersedes_before_load_completes() {
    let (mut host, tally, _) = manual_host();
    let a = host.render(build("", "", ""));
    assert_eq!(host.status_of(a), Some(SessionStatus::Loading));

    let b = host.render(build("", "", ""));
    assert_eq!(host.status_of(a), Some(SessionStatus::Superseded));
    assert_eq!(host.status_of(b), Some(SessionStatus::Loading));

    // A's late load event is ignored.
    let stale = tally.channel(0);
    assert!(!host.complete_load(stale.origin(), a, Ok(())));
    assert_eq!(host.status_of(a), Some(SessionStatus::Superseded));
    assert!(host.drain_completions().is_empty());

    let live = tally.channel(1);
    assert!(host.complete_load(live.origin(), b, Ok(())));
    let completions = host.drain_completions();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].session, b);
    assert_eq!(completions[0].status, SessionStatus::Ready);
    assert!(completions[0].latency.is_some());
}

#[test]
fn test_spawn_failure_marks_session_failed() {
    let backend = ManualBackend {
        fail_spawn: true,
        ..Default::default()
    };
    let (tx, _rx) = mpsc::channel(4);
    let mut host = SandboxHost::new(Box::new(backend), tx);
    let mut relay = MessageRelay::new(10);

    let id = host.render(build("", "", ""));
    assert_eq!(host.status_of(id), Some(SessionStatus::Failed));

    for completion in host.drain_completions() {
        assert_eq!(completion.status, SessionStatus::Failed);
        relay.record_error(completion.session, completion.error.unwrap_or_default());
    }
    let entries: Vec<_> = relay.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Error);
    assert!(entries[0].message.contains("refused"));
}

#[test]
fn test_load_failure_emits_synthetic_error() {
    let (mut host, tally, _) = manual_host();
    let mut relay = MessageRelay::new(10);
    let id = host.render(build("", "", ""));
    let channel = tally.channel(0);

    deliver(
        &mut host,
        &mut relay,
        Envelope {
            origin: channel.origin(),
            session: id,
            event: SandboxEvent::LoadFailed("sandbox exited with 1".into()),
        },
    );

    assert_eq!(host.status_of(id), Some(SessionStatus::Failed));
    let entry = relay.entries().next().unwrap();
    assert_eq!(entry.session_id, id);
    assert_eq!(entry.severity, Severity::Error);
}

#[test]
fn test_expire_only_affects_loading_session() {
    let (mut host, tally, _) = manual_host();
    let id = host.render(build("", "", ""));

    assert!(host.expire(id, Duration::from_secs(5)));
    assert_eq!(host.status_of(id), Some(SessionStatus::Failed));
    assert_eq!(tally.torn_down(), 1);
    assert!(!host.expire(id, Duration::from_secs(5)));

    let completions = host.drain_completions();
    assert!(completions[0].error.as_deref().unwrap().contains("timed out"));
}

#[test]
fn test_dispose_tears_down_and_ignores_events() {
    let (mut host, tally, _) = manual_host();
    let id = host.render(build("", "", ""));
    host.dispose();

    assert_eq!(tally.torn_down(), 1);
    let channel = tally.channel(0);
    assert_eq!(
        host.verify(channel.origin(), id),
        Err(Rejection::ForeignOrigin)
    );
    assert!(!host.complete_load(channel.origin(), id, Ok(())));
}

// ----------------------------------------------------------------------------
// Relay filtering
// ----------------------------------------------------------------------------

#[test]
fn test_superseded_session_contributes_nothing() {
    let (mut host, tally, _) = manual_host();
    let mut relay = MessageRelay::new(50);

    let a = host.render(build("", "", ""));
    let b = host.render(build("", "", ""));
    let stale = tally.channel(0);
    let live = tally.channel(1);

    assert!(relay.receive(&host, stale.origin(), a, log("from a")).is_none());
    let entry = relay.receive(&host, live.origin(), b, log("from b")).unwrap();

    assert_eq!(entry.session_id, b);
    assert!(relay.entries().all(|e| e.session_id == b));
    assert_eq!(relay.dropped(), 1);
}

#[test]
fn test_foreign_origin_dropped_even_with_current_session() {
    let (mut host, _, _) = manual_host();
    let mut relay = MessageRelay::new(50);
    let current = host.render(build("", "", ""));

    let spoofed = ContextId::new(999);
    assert_eq!(host.verify(spoofed, current), Err(Rejection::ForeignOrigin));
    assert!(relay.receive(&host, spoofed, current, log("spoof")).is_none());
    assert!(relay.is_empty());
    assert_eq!(relay.dropped(), 1);
}

#[test]
fn test_live_origin_with_stale_session_is_dropped() {
    let (mut host, tally, _) = manual_host();
    let mut relay = MessageRelay::new(50);
    host.render(build("", "", ""));
    let live = tally.channel(0);

    let forged_session = SessionId::new(42);
    assert_eq!(
        host.verify(live.origin(), forged_session),
        Err(Rejection::StaleSession)
    );
    assert!(relay.receive(&host, live.origin(), forged_session, log("x")).is_none());
}

#[test]
fn test_log_is_bounded_and_evicts_oldest() {
    let (mut host, tally, _) = manual_host();
    let mut relay = MessageRelay::new(3);
    let id = host.render(build("", "", ""));
    let origin = tally.channel(0).origin();

    for i in 0..5 {
        relay.receive(&host, origin, id, log(&format!("m{i}")));
    }
    let messages: Vec<_> = relay.entries().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["m2", "m3", "m4"]);
}

#[test]
fn test_handlers_see_entries_in_order() {
    use parking_lot::Mutex;
    use std::sync::Arc;

    let (mut host, tally, _) = manual_host();
    let mut relay = MessageRelay::new(50);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    relay.on_message(move |entry| sink.lock().push(entry.message.clone()));

    let id = host.render(build("", "", ""));
    let origin = tally.channel(0).origin();
    for message in ["one", "two", "three"] {
        relay.receive(&host, origin, id, log(message));
    }
    assert_eq!(*seen.lock(), vec!["one", "two", "three"]);
}

// ----------------------------------------------------------------------------
// Scenarios through the scripted backend
// ----------------------------------------------------------------------------

async fn run_scripted(
    markup: &str,
    style: &str,
    script: &str,
) -> (SandboxHost, MessageRelay, SessionId) {
    let (tx, mut rx) = mpsc::channel(64);
    let mut host = SandboxHost::new(Box::new(ScriptedBackend::default()), tx);
    let mut relay = MessageRelay::new(50);
    let id = host.render(build(markup, style, script));

    while host.status_of(id) == Some(SessionStatus::Loading) {
        let envelope = rx.recv().await.unwrap();
        deliver(&mut host, &mut relay, envelope);
    }
    (host, relay, id)
}

#[tokio::test]
async fn test_console_log_scenario() {
    let (host, relay, id) = run_scripted("<p>hi</p>", "p{color:red}", "console.log('x')").await;

    assert_eq!(host.status_of(id), Some(SessionStatus::Ready));
    let entries: Vec<_> = relay.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Info);
    assert_eq!(entries[0].message, "x");
    assert_eq!(entries[0].session_id, id);
}

#[tokio::test]
async fn test_thrown_error_scenario() {
    let (host, relay, id) = run_scripted("", "", "throw new Error('boom')").await;

    assert_eq!(host.status_of(id), Some(SessionStatus::Ready));
    let entries: Vec<_> = relay.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Error);
    assert!(entries[0].message.contains("boom"));
}
