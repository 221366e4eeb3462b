//! Lexcheck API server
//!
//! Starts the HTTP server for statute extraction and verification.

use lexcheck_api::{config::ApiConfig, start_server, ServerError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the legal database API key
const API_KEY_VAR: &str = "LEXCHECK_API_KEY";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let mut config = if args.len() > 2 && args[1] == "--config" {
        ApiConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: lexcheck-api --config <path-to-config.toml>");
        eprintln!();
        ApiConfig::default()
    };

    if config.source.api_key.is_none() {
        config.source.api_key = env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty());
    }

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Lexcheck API - Statute Reference Extraction and Verification");
    println!();
    println!("USAGE:");
    println!("    lexcheck-api --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}   API key for the legal database", API_KEY_VAR);
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port: where to listen (default 127.0.0.1:8080)");
    println!("    - database_path: SQLite file (default lexcheck.db)");
    println!("    - [source]: base_url, api_key, timeout_secs of the legal database");
    println!("    - [client]: retry, cache, and rate limit policy");
    println!("    - [extractor]: text limit, concurrency, staleness");
    println!("    - [sweep]: background re-verification; omitted to disable");
    println!();
}
