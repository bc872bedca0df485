//! Trailing-edge debounce scheduler.
//!
//! Each [`DebounceScheduler::notify`] replaces the pending timer with a new
//! one, so a burst of edits produces a single callback once the quiescence
//! window has passed without further edits.
//!
//! Timers run on the tokio runtime; `notify` must be called from inside it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Default quiescence window.
pub const DEFAULT_QUIESCENCE_MS: u64 = 500;

/// Receives the generation of the timer that fired.
type FireCallback = Box<dyn FnMut(u64) + Send>;

/// Coalesces edit notifications into one trailing callback.
///
/// Cloning yields another handle to the same timer.
#[derive(Clone)]
pub struct DebounceScheduler {
    inner: Arc<Mutex<State>>,
    window: Duration,
}

struct State {
    /// Bumped by every notify/cancel; a timer only fires if it still matches.
    generation: u64,
    pending: Option<JoinHandle<()>>,
    callback: Option<FireCallback>,
}

impl DebounceScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                generation: 0,
                pending: None,
                callback: None,
            })),
            window,
        }
    }

    /// Register the trailing-edge callback, replacing any previous one.
    ///
    /// The callback in place when the timer fires is the one invoked. It gets
    /// the timer's generation; see [`DebounceScheduler::is_current`].
    pub fn on_fire(&self, callback: impl FnMut(u64) + Send + 'static) {
        self.inner.lock().callback = Some(Box::new(callback));
    }

    /// Record an edit and restart the quiescence window.
    pub fn notify(&self) {
        let mut state = self.inner.lock();
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        if let Some(previous) = state.pending.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        let window = self.window;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            fire(&inner, generation);
        }));
    }

    /// Drop the pending timer without firing.
    pub fn cancel(&self) {
        let mut state = self.inner.lock();
        state.generation = state.generation.wrapping_add(1);
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
    }

    /// Whether `generation` is still the latest notify with no cancel or
    /// notify after it.
    ///
    /// A fire forwarded elsewhere can be overtaken by a `cancel` before it is
    /// acted on; the receiver checks this to drop it.
    pub fn is_current(&self, generation: u64) -> bool {
        self.inner.lock().generation == generation
    }

    /// Whether a timer is currently waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.inner
            .lock()
            .pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

fn fire(inner: &Mutex<State>, generation: u64) {
    // Run the callback outside the lock so it may call notify/cancel.
    let mut callback = {
        let mut state = inner.lock();
        if state.generation != generation {
            return;
        }
        state.pending = None;
        match state.callback.take() {
            Some(callback) => callback,
            None => return,
        }
    };

    callback(generation);

    let mut state = inner.lock();
    if state.callback.is_none() {
        state.callback = Some(callback);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WINDOW: Duration = Duration::from_millis(DEFAULT_QUIESCENCE_MS);

    fn counting(scheduler: &DebounceScheduler) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        scheduler.on_fire(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once() {
        let scheduler = DebounceScheduler::new(WINDOW);
        let count = counting(&scheduler);

        for _ in 0..5 {
            scheduler.notify();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(WINDOW * 2).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_fire_separately() {
        let scheduler = DebounceScheduler::new(WINDOW);
        let count = counting(&scheduler);

        scheduler.notify();
        tokio::time::sleep(WINDOW + Duration::from_millis(10)).await;
        scheduler.notify();
        tokio::time::sleep(WINDOW + Duration::from_millis(10)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let scheduler = DebounceScheduler::new(WINDOW);
        let count = counting(&scheduler);

        scheduler.notify();
        assert!(scheduler.is_pending());
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        tokio::time::sleep(WINDOW * 2).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_callback_wins() {
        let scheduler = DebounceScheduler::new(WINDOW);
        let first = counting(&scheduler);
        scheduler.notify();
        let second = counting(&scheduler);

        tokio::time::sleep(WINDOW * 2).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_may_renotify() {
        let scheduler = DebounceScheduler::new(WINDOW);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let again = scheduler.clone();
        scheduler.on_fire(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                again.notify();
            }
        });

        scheduler.notify();
        tokio::time::sleep(WINDOW * 3).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_makes_generation_stale() {
        let scheduler = DebounceScheduler::new(WINDOW);
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        scheduler.on_fire(move |generation| sink.lock().push(generation));

        scheduler.notify();
        tokio::time::sleep(WINDOW * 2).await;
        let generation = fired.lock()[0];
        assert!(scheduler.is_current(generation));

        scheduler.cancel();
        assert!(!scheduler.is_current(generation));
    }
}
