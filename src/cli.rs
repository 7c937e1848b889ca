//! Command-line interface parsing for rclookup
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `LookupConfig`, starting from the built-in defaults.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::config::LookupConfig;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A `--header` value is not of the form `NAME:VALUE`
    #[error("Invalid header: '{0}'. Expected NAME:VALUE")]
    InvalidHeader(String),
}

/// rclookup - Look up vehicle registration details
#[derive(Parser, Debug)]
#[command(name = "rclookup")]
#[command(about = "Vehicle registration lookup with cached record scraping")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the record search pages
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Seconds a completed lookup is served from cache
    #[arg(long, global = true, value_name = "SECS")]
    pub ttl_secs: Option<u64>,

    /// Seconds before an upstream request is abandoned
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Extra or overriding request header, repeatable
    ///
    /// Example: --header "Referer:https://example.com/"
    #[arg(long = "header", global = true, value_name = "NAME:VALUE")]
    pub headers: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the lookup API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },
    /// Look up a single registration number and print the result as JSON
    Lookup {
        /// Registration number, e.g. "MH12 AB 1234"
        rc: String,
    },
}

/// Splits a `NAME:VALUE` header argument
///
/// # Returns
/// * `Ok((name, value))` with both sides trimmed
/// * `Err(CliError::InvalidHeader)` if there is no colon or the name is empty
pub fn parse_header_arg(s: &str) -> Result<(String, String), CliError> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(CliError::InvalidHeader(s.to_string())),
    }
}

impl Cli {
    /// Builds the lookup configuration, applying flags over the defaults
    pub fn to_config(&self) -> Result<LookupConfig, CliError> {
        let mut config = LookupConfig::default();

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.ttl_secs {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout_secs {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        for raw in &self.headers {
            let (name, value) = parse_header_arg(raw)?;
            config.set_header(&name, &value);
        }

        Ok(config)
    }
}
