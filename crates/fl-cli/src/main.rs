use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use fl_cli::commands::{events, source, status, summary, timeline};
use fl_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Timeline { range, json }) => {
            let events = source::load_events(range, &config)?;
            timeline::run(&mut stdout, &events, *json)?;
        }
        Some(Commands::Summary { range, json }) => {
            let batch = source::load_batch(range, &config)?;
            summary::run(&mut stdout, &batch, *json)?;
        }
        Some(Commands::Events { range }) => {
            let events = source::load_events(range, &config)?;
            events::run(&mut stdout, &events)?;
        }
        Some(Commands::Status) => {
            status::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
