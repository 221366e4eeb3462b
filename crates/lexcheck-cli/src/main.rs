//! Lexcheck CLI - Extract statute references from documents and verify them.

use clap::Parser;
use lexcheck_cli::commands;
use lexcheck_cli::{Cli, Command, Config, Formatter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> lexcheck_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load or create config
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => {
            let path = Config::path()?;
            let first_run = !path.exists();
            let cfg = Config::load_from(&path)?;
            if first_run {
                if let Err(e) = cfg.save_to(&path) {
                    tracing::warn!("Could not write default configuration: {}", e);
                }
            }
            cfg
        }
    };

    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if cli.api_key.is_some() {
        config.source.api_key = cli.api_key;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let extractor = commands::open_extractor(&config)?;

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &extractor, &formatter).await?;
        }
        Command::List(args) => {
            commands::execute_list(args, &extractor, &formatter)?;
        }
        Command::Show(args) => {
            commands::execute_show(args, &extractor, &formatter)?;
        }
        Command::Verify(args) => {
            commands::execute_verify(args, &extractor, &formatter).await?;
        }
        Command::Sweep(args) => {
            commands::execute_sweep(args, Arc::new(extractor), &config.sweep, &formatter).await?;
        }
        Command::Forget(args) => {
            commands::execute_forget(args, &extractor, &formatter)?;
        }
    }

    Ok(())
}
