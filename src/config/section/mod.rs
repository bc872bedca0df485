//! Configuration section definitions.
//!
//! Each module corresponds to a section in `playpen.toml`:
//!
//! | Module    | TOML Section | Purpose                              |
//! |-----------|--------------|--------------------------------------|
//! | `preview` | `[preview]`  | Debounce window, document title      |
//! | `sandbox` | `[sandbox]`  | Runner command, load timeout         |
//! | `log`     | `[log]`      | Visible log capacity                 |
//! | `storage` | `[storage]`  | Snapshot location and validity       |
//! | `share`   | `[share]`    | Share link base URL and parameter    |

mod log;
mod preview;
mod sandbox;
mod share;
mod storage;

pub use log::LogConfig;
pub use preview::PreviewConfig;
pub use sandbox::SandboxConfig;
pub use share::ShareConfig;
pub use storage::StorageConfig;
