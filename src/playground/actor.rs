//! Playground actor.
//!
//! All playground state lives here and is touched only by [`PlaygroundActor::run`].
//! Timers and sandbox contexts talk to it exclusively through its two
//! channels:
//!
//! ```text
//! handles, debounce, load timer --PlaygroundMsg--> inbox  --+
//!                                                           +--> run loop
//! execution contexts -----------Envelope---------> events --+
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::messages::PlaygroundMsg;
use super::{Command, Observer};
use crate::buffer::starter::starter;
use crate::buffer::{Language, SourceBufferStore};
use crate::metrics::MetricsCollector;
use crate::persist::LocalStore;
use crate::preview::DocumentBuilder;
use crate::sandbox::{Envelope, MessageRelay, SandboxEvent, SandboxHost, SessionStatus};
use crate::schedule::DebounceScheduler;
use crate::utils::plural::plural_count;
use crate::{debug, log};

pub(super) struct PlaygroundActor {
    pub(super) inbox: mpsc::UnboundedReceiver<PlaygroundMsg>,
    /// Weak, so dropping every handle stops the actor.
    pub(super) myself: mpsc::WeakUnboundedSender<PlaygroundMsg>,
    pub(super) events: mpsc::Receiver<Envelope>,

    pub(super) store: SourceBufferStore,
    pub(super) scheduler: DebounceScheduler,
    pub(super) builder: DocumentBuilder,
    pub(super) host: SandboxHost,
    pub(super) relay: MessageRelay,
    pub(super) metrics: MetricsCollector,
    pub(super) storage: Option<LocalStore>,
    pub(super) autosave: bool,
    pub(super) load_timeout: Option<Duration>,
    pub(super) observers: Vec<Arc<dyn Observer>>,
    pub(super) active: Language,
}

impl PlaygroundActor {
    /// Wire the store to the scheduler and the scheduler back to the inbox.
    pub(super) fn connect(&mut self) {
        let scheduler = self.scheduler.clone();
        self.store.on_change(move |_| scheduler.notify());

        let myself = self.myself.clone();
        self.scheduler.on_fire(move |generation| {
            if let Some(tx) = myself.upgrade() {
                let _ = tx.send(PlaygroundMsg::DebounceFired(generation));
            }
        });

        for observer in &self.observers {
            let observer = Arc::clone(observer);
            self.relay.on_message(move |entry| observer.on_log_entry(entry));
        }
    }

    pub(super) async fn run(mut self) {
        debug!(
            "playground";
            "start ({} backend, log capacity {})",
            self.host.backend_name(),
            self.relay.capacity()
        );
        self.measure();
        self.render();
        self.flush_completions();

        loop {
            tokio::select! {
                biased;

                msg = self.inbox.recv() => {
                    let Some(msg) = msg else { break };
                    if !self.handle(msg) {
                        break;
                    }
                }
                Some(envelope) = self.events.recv() => self.deliver(envelope),
            }
            self.flush_completions();
        }

        self.scheduler.cancel();
        self.host.dispose();
        debug!("playground"; "stopped");
    }

    /// Returns `false` when the actor should stop.
    fn handle(&mut self, msg: PlaygroundMsg) -> bool {
        match msg {
            PlaygroundMsg::Set { language, text } => {
                self.store.set(language, text);
                self.measure();
            }
            PlaygroundMsg::Restore(buffers) => {
                self.store.restore(buffers);
                self.measure();
            }
            PlaygroundMsg::Command(command) => self.command(command),

            PlaygroundMsg::Snapshot(reply) => {
                let _ = reply.send(self.store.snapshot());
            }
            PlaygroundMsg::Logs(reply) => {
                let _ = reply.send(self.relay.entries().cloned().collect());
            }
            PlaygroundMsg::Metrics(reply) => {
                let _ = reply.send(self.metrics.snapshot());
            }
            PlaygroundMsg::Session(reply) => {
                let session = self
                    .host
                    .current_session()
                    .and_then(|id| self.host.status_of(id).map(|status| (id, status)));
                let _ = reply.send(session);
            }
            PlaygroundMsg::ActiveBuffer(reply) => {
                let _ = reply.send(self.active);
            }

            PlaygroundMsg::DebounceFired(generation) => {
                if !self.scheduler.is_current(generation) {
                    debug!("playground"; "stale debounce fire ignored");
                    return true;
                }
                self.render();
                if self.autosave {
                    self.save();
                }
            }
            PlaygroundMsg::LoadTimeout(session) => {
                if let Some(after) = self.load_timeout
                    && self.host.expire(session, after)
                {
                    debug!("playground"; "session {} timed out", session);
                }
            }
            PlaygroundMsg::Dispose => return false,
        }
        true
    }

    fn command(&mut self, command: Command) {
        debug!("playground"; "command: {}", command);
        match command {
            Command::Run => {
                if self.scheduler.is_pending() {
                    debug!("playground"; "pending debounce folded into run");
                }
                self.scheduler.cancel();
                self.render();
            }
            Command::Save => self.save(),
            Command::SwitchBuffer(language) => {
                self.active = language;
                debug!("playground"; "editing {}", language.label());
            }
            Command::ExitFullscreen => {}
            Command::ClearLog => {
                if !self.relay.is_empty() {
                    debug!("playground"; "cleared {}", plural_count(self.relay.len(), "message"));
                    self.relay.clear();
                }
            }
            Command::Reset => {
                self.store.restore(starter());
                self.measure();
            }
        }
    }

    fn render(&mut self) {
        let buffers = self.store.buffers();
        let document = self.builder.build(&buffers.html, &buffers.css, &buffers.js);
        let session = self.host.render(document);
        self.metrics.record_render();

        if let Some(after) = self.load_timeout {
            let myself = self.myself.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                if let Some(tx) = myself.upgrade() {
                    let _ = tx.send(PlaygroundMsg::LoadTimeout(session));
                }
            });
        }
        self.publish_metrics();
    }

    fn save(&mut self) {
        let Some(storage) = &self.storage else {
            debug!("playground"; "save skipped, no storage configured");
            return;
        };
        match storage.save(&self.store.snapshot()) {
            Ok(()) => {
                let changed: Vec<_> = Language::ALL
                    .into_iter()
                    .filter(|&language| self.store.is_dirty(language))
                    .map(Language::name)
                    .collect();
                self.store.clear_dirty();
                debug!(
                    "playground";
                    "saved to {} (changed: {})",
                    storage.path().display(),
                    if changed.is_empty() { "none".to_string() } else { changed.join(", ") }
                );
            }
            Err(e) => log!("error"; "save failed: {}", e),
        }
    }

    fn deliver(&mut self, envelope: Envelope) {
        let Envelope {
            origin,
            session,
            event,
        } = envelope;

        match event {
            SandboxEvent::Loaded => {
                self.host.complete_load(origin, session, Ok(()));
            }
            SandboxEvent::LoadFailed(reason) => {
                self.host.complete_load(origin, session, Err(reason));
            }
            SandboxEvent::Message(message) => {
                let dropped = self.relay.dropped();
                self.relay.receive(&self.host, origin, session, message);
                if self.relay.dropped() != dropped {
                    self.metrics.record_dropped();
                    self.publish_metrics();
                }
            }
        }
    }

    /// Surface queued load outcomes to the log, metrics and observers.
    fn flush_completions(&mut self) {
        for completion in self.host.drain_completions() {
            match completion.status {
                SessionStatus::Ready => {
                    if let Some(latency) = completion.latency {
                        self.metrics.record_render_latency(latency);
                    }
                }
                _ => {
                    if let Some(error) = &completion.error {
                        self.relay.record_error(completion.session, error.as_str());
                    }
                }
            }

            for observer in &self.observers {
                observer.on_render_complete(completion.session, completion.status);
            }
            self.publish_metrics();
        }
    }

    fn measure(&mut self) {
        self.metrics.measure(self.store.buffers());
        self.publish_metrics();
    }

    fn publish_metrics(&self) {
        let metrics = self.metrics.snapshot();
        for observer in &self.observers {
            observer.on_metrics_update(&metrics);
        }
    }
}
