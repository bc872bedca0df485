//! playpen - sandboxed live preview for html/css/js playgrounds.

mod buffer;
mod cli;
mod config;
mod logger;
mod metrics;
mod persist;
mod playground;
mod preview;
mod sandbox;
mod schedule;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, ShareAction};
use config::PlaypenConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PlaypenConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Render { sources, share } => {
            cli::render::render_once(&config, sources, share.as_deref())
        }
        Commands::Watch { sources } => cli::watch::watch_sources(&config, sources),
        Commands::Build { sources, output } => {
            cli::build::build_document(&config, sources, output.as_deref())
        }
        Commands::Share { action } => match action {
            ShareAction::Encode { sources } => cli::share::encode_link(&config, sources),
            ShareAction::Decode { input, output } => {
                cli::share::decode_link(&config, input, output.as_deref())
            }
        },
        Commands::Save { sources } => cli::store::save_snapshot(&config, sources),
        Commands::Restore { output } => cli::store::restore_snapshot(&config, output.as_deref()),
    }
}
