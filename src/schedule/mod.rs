//! Edit scheduling.
//!
//! - `debounce` - Trailing-edge debounce timer for render requests

mod debounce;

pub use debounce::{DEFAULT_QUIESCENCE_MS, DebounceScheduler};
