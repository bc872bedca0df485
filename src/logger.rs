//! Terminal output with colored module prefixes and a render status line.
//!
//! - `log!` / `debug!` print `[module] message` to stderr
//! - `RenderStatus` shows the latest render outcome, overwriting the
//!   previous one so watch mode keeps a single status block
//!
//! ```ignore
//! log!("sandbox"; "spawned {}", program);
//! debug!("relay"; "dropped message from {}", origin);
//! status_ready("#3 rendered in 41ms");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;
use std::{
    fmt::Display,
    io::{IsTerminal, Write, stderr},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose)
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log only when --verbose is enabled.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Print `[module] message`.
///
/// A status block on screen is cleared first and forgotten, so the next
/// status starts below this line.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut status = RENDER_STATUS.lock();
    let mut out = stderr().lock();
    status.erase(&mut out);
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Render `text` in `style` when stderr takes color.
///
/// Goes through `if_supports_color`, so `--color` and TTY detection apply.
pub fn paint(text: impl Display, style: Style) -> String {
    text.if_supports_color(Stream::Stderr, |t| t.style(style))
        .to_string()
}

/// Color a module prefix by module name.
fn colorize_prefix(module: &str) -> String {
    let style = match module.to_ascii_lowercase().as_str() {
        "render" | "playground" => Style::new().bright_blue(),
        "watch" => Style::new().bright_green(),
        "console" => Style::new().bright_cyan(),
        "error" => Style::new().bright_red(),
        "warning" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    };
    paint(format_args!("[{module}]"), style.bold())
}

// ============================================================================
// Render Status (single block, overwritten)
// ============================================================================

/// Current UTC time as HH:MM:SS.
fn clock() -> String {
    let secs = crate::utils::time::now_millis() / 1000;
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Latest render outcome, redrawn in place.
pub struct RenderStatus {
    /// Lines of previous output to clear
    last_lines: usize,
}

static RENDER_STATUS: LazyLock<Mutex<RenderStatus>> =
    LazyLock::new(|| Mutex::new(RenderStatus::new()));

impl RenderStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn ready(&mut self, message: &str) {
        self.display(&paint("✓", Style::new().green()), message);
    }

    pub fn pending(&mut self, message: &str) {
        self.display("", &paint(message, Style::new().dimmed()));
    }

    pub fn failed(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(&paint("✗", Style::new().red()), &message);
    }

    fn display(&mut self, symbol: &str, message: &str) {
        let mut out = stderr().lock();
        self.erase(&mut out);

        let timestamp = paint(format_args!("[{}]", clock()), Style::new().dimmed());
        if symbol.is_empty() {
            writeln!(out, "{timestamp} {message}").ok();
        } else {
            writeln!(out, "{timestamp} {symbol} {message}").ok();
        }
        out.flush().ok();

        self.last_lines = line_count(message);
    }

    /// Clear the previous block. Only a terminal can be rewound.
    fn erase(&mut self, out: &mut impl Write) {
        if self.last_lines > 0 && stderr().is_terminal() {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(out, cursor::MoveUp(lines)).ok();
            execute!(out, Clear(ClearType::FromCursorDown)).ok();
        }
        self.last_lines = 0;
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

pub fn status_ready(message: &str) {
    RENDER_STATUS.lock().ready(message);
}

pub fn status_pending(message: &str) {
    RENDER_STATUS.lock().pending(message);
}

pub fn status_failed(summary: &str, detail: &str) {
    RENDER_STATUS.lock().failed(summary, detail);
}
