//! regcheck - validate registration input from the command line.
//!
//! Prints a JSON report on success. On failure prints a JSON error body and
//! exits with a code describing the failure kind.

mod args;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::error::EXIT_SUCCESS;
use common::RegistrationConfig;

use crate::args::Cli;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    // Environment first, flags on top
    let config = cli.apply_to(RegistrationConfig::from_env());
    tracing::debug!("Configuration loaded");

    let result = commands::execute(cli.command.clone(), &config)
        .await
        .and_then(|report| report.to_json(cli.pretty));

    let code = match result {
        Ok(output) => {
            println!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::debug!("Command failed: {}", e);
            let body = e.to_response();
            match serde_json::to_string(&body) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e.user_message()),
            }
            e.exit_code()
        }
    };

    std::process::exit(code);
}

/// Initialize tracing subscriber, writing to stderr so stdout stays JSON
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
