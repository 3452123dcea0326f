//! Subcommand implementations.
//!
//! Results are written to stdout as pretty JSON; progress and errors go
//! through `tracing` on stderr.

pub mod auth;
pub mod cart;
pub mod files;
pub mod products;
pub mod users;

use std::io::Write;

use secrecy::SecretString;
use serde::Serialize;
use shopfront_client::{ApiError, CartError, ClientConfig, ConfigError, StoreApi};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A command-line value was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading a local file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the API client from the environment.
pub fn connect() -> Result<StoreApi, CliError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Loaded configuration");
    Ok(StoreApi::new(&config)?)
}

/// Write `value` to stdout as pretty JSON.
pub fn emit<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Password from the flag, falling back to `SHOPFRONT_PASSWORD`.
pub fn password(flag: Option<String>) -> Result<SecretString, CliError> {
    flag.or_else(|| std::env::var("SHOPFRONT_PASSWORD").ok())
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            CliError::InvalidArgument(
                "password required: pass --password or set SHOPFRONT_PASSWORD".to_string(),
            )
        })
}
