use anyhow::{Context, Result};
use clap::Parser;
use color_eyre::config::HookBuilder;
use s3menu_core::{load_config, load_config_from, ConfigFile, S3Store};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actions;
mod app;
mod session;
mod terminal;
#[cfg(test)]
mod testing;

use crate::session::Session;
use crate::terminal::Console;

/// s3menu - interactive menu for everyday S3 bucket and object tasks
#[derive(Parser, Debug)]
#[command(name = "s3menu")]
#[command(version)]
#[command(about = "Interactive menu for basic S3 bucket and object operations", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/s3menu/config.toml)
    #[arg(short, long, env = "S3MENU_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    init_logging(&config);

    // The S3 store drives its own runtime, so main stays synchronous.
    let store = S3Store::connect(&config.storage).context("Failed to set up the S3 client")?;

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    let mut session = Session::new(console, &store, config.menu.clone());
    let mut menu = app::build_menu(&config.menu.app_name, config.menu.max_invalid_choices)?;

    app::run(&mut menu, &mut session)?;

    Ok(())
}

/// Log to stderr so records never interleave with the menu on stdout.
/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &ConfigFile) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
