//! rclookup - Vehicle registration lookup service
//!
//! Serves lookups over HTTP, or performs a single lookup from the command line
//! and prints the JSON envelope.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rclookup::cli::{Cli, Command};
use rclookup::data::VehicleClient;
use rclookup::server::{self, Envelope};

/// Exit code for a lookup that completed without finding a record
const EXIT_NOT_FOUND: u8 = 1;

/// Exit code for invalid flags or a client that could not be built, as clap
/// uses for usage errors
const EXIT_CONFIG_ERROR: u8 = 2;

/// Exit code for a lookup that failed upstream
const EXIT_UPSTREAM_ERROR: u8 = 3;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Logs go to stderr so `lookup` output stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = match cli
        .to_config()
        .map_err(|e| e.to_string())
        .and_then(|config| VehicleClient::from_config(&config).map_err(|e| e.to_string()))
    {
        Ok(client) => Arc::new(client),
        Err(message) => {
            eprintln!("Error: {}", message);
            return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
        }
    };

    match cli.command {
        Command::Serve { bind } => {
            server::start(bind, client).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Lookup { rc } => {
            let envelope = Envelope::from_lookup(client.lookup(&rc).await);
            println!("{}", serde_json::to_string_pretty(&envelope)?);

            let code = match envelope {
                Envelope::Success { .. } => 0,
                Envelope::NotFound { .. } => EXIT_NOT_FOUND,
                Envelope::Error { .. } => EXIT_UPSTREAM_ERROR,
            };
            Ok(ExitCode::from(code))
        }
    }
}
