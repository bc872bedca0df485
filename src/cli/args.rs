//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Sandboxed live preview for html/css/js playgrounds
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: playpen.toml)
    #[arg(short = 'C', long, global = true, default_value = crate::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the buffers once and print what the sandbox logged
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        sources: SourceArgs,

        /// Render the buffers of a share token or link instead of files
        #[arg(long, value_name = "TOKEN|URL", conflicts_with_all = ["html", "css", "js"])]
        share: Option<String>,
    },

    /// Re-render whenever a source file changes; reads commands from stdin
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Write the generated preview document
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output file (default: stdout)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Encode or decode share links
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },

    /// Save the buffers to local storage
    Save {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Restore the saved buffers, if still valid
    Restore {
        /// Directory to write index.html, style.css and script.js into
        /// (default: print as JSON)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ShareAction {
    /// Print a share link for the buffers
    Encode {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Decode a share token or link
    Decode {
        #[arg(value_name = "TOKEN|URL")]
        input: String,

        /// Directory to write index.html, style.css and script.js into
        /// (default: print as JSON)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },
}

/// The three source files. A missing file means an empty buffer.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Markup file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub html: Option<PathBuf>,

    /// Style file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub css: Option<PathBuf>,

    /// Script file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub js: Option<PathBuf>,
}
