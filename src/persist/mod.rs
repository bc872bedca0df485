//! Persistence and sharing of buffer snapshots.
//!
//! - `local` - Durable snapshot storage with a validity window
//! - `share` - URL-safe share tokens and share links

pub mod local;
pub mod share;

pub use local::LocalStore;
pub use share::{decode_share, encode_share, share_url, token_from_url};
