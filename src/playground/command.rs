//! Playground commands and their text forms.
//!
//! Watch mode reads commands from stdin, one per line:
//!
//! | Input                 | Command                     |
//! |-----------------------|-----------------------------|
//! | `r`, `run`            | `Run`                       |
//! | `s`, `save`           | `Save`                      |
//! | `1` / `2` / `3`       | `SwitchBuffer(html/css/js)` |
//! | `html`, `css`, `js`   | `SwitchBuffer(..)`          |
//! | `esc`, `exit`         | `ExitFullscreen`            |
//! | `clear`               | `ClearLog`                  |
//! | `reset`               | `Reset`                     |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::buffer::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Render now, cancelling any pending debounce.
    Run,
    /// Save the current snapshot to local storage.
    Save,
    /// Select the buffer edits are aimed at.
    SwitchBuffer(Language),
    /// Leave fullscreen. Presentation only; the core ignores it.
    ExitFullscreen,
    ClearLog,
    /// Replace all buffers with the starter template.
    Reset,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command `{0}` (try run, save, 1/2/3, esc, clear, reset)")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let command = match input.as_str() {
            "r" | "run" => Self::Run,
            "s" | "save" => Self::Save,
            "1" => Self::SwitchBuffer(Language::Html),
            "2" => Self::SwitchBuffer(Language::Css),
            "3" => Self::SwitchBuffer(Language::Js),
            "esc" | "exit" => Self::ExitFullscreen,
            "clear" => Self::ClearLog,
            "reset" => Self::Reset,
            other => match other.parse::<Language>() {
                Ok(language) => Self::SwitchBuffer(language),
                Err(_) => return Err(ParseCommandError(s.trim().to_string())),
            },
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run => f.write_str("run"),
            Self::Save => f.write_str("save"),
            Self::SwitchBuffer(language) => write!(f, "switch to {language}"),
            Self::ExitFullscreen => f.write_str("exit fullscreen"),
            Self::ClearLog => f.write_str("clear log"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts() {
        assert_eq!("r".parse(), Ok(Command::Run));
        assert_eq!(" Run ".parse(), Ok(Command::Run));
        assert_eq!("s".parse(), Ok(Command::Save));
        assert_eq!("esc".parse(), Ok(Command::ExitFullscreen));
        assert_eq!("exit".parse(), Ok(Command::ExitFullscreen));
        assert_eq!("clear".parse(), Ok(Command::ClearLog));
        assert_eq!("reset".parse(), Ok(Command::Reset));
    }

    #[test]
    fn test_buffer_selection() {
        assert_eq!("1".parse(), Ok(Command::SwitchBuffer(Language::Html)));
        assert_eq!("2".parse(), Ok(Command::SwitchBuffer(Language::Css)));
        assert_eq!("3".parse(), Ok(Command::SwitchBuffer(Language::Js)));
        assert_eq!("css".parse(), Ok(Command::SwitchBuffer(Language::Css)));
        assert_eq!("javascript".parse(), Ok(Command::SwitchBuffer(Language::Js)));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            "4".parse::<Command>(),
            Err(ParseCommandError("4".to_string()))
        );
        assert!("".parse::<Command>().is_err());
    }
}
