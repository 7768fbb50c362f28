//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

const MIN_SECRET_LEN: usize = 32;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all server configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub token_secret: String,
    pub processing_delay: Duration,
    pub species_latency: Duration,
    pub dna_latency: Duration,
    pub seed_demo_data: bool,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level = log_level_from_env()?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        // --- Load Token Settings ---
        let token_secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingVar("TOKEN_SECRET".to_string()))?;
        if token_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "TOKEN_SECRET".to_string(),
                format!("must be at least {} bytes", MIN_SECRET_LEN),
            ));
        }

        // --- Load Simulation Settings ---
        let processing_delay = millis_from_env("PROCESSING_DELAY_MS", 5000)?;
        let species_latency = millis_from_env("SPECIES_LATENCY_MS", 2000)?;
        let dna_latency = millis_from_env("DNA_LATENCY_MS", 3000)?;

        let seed_demo_data = match std::env::var("SEED_DEMO_DATA") {
            Ok(value) => value.parse::<bool>().map_err(|_| {
                ConfigError::InvalidValue(
                    "SEED_DEMO_DATA".to_string(),
                    format!("'{}' is not true or false", value),
                )
            })?,
            Err(_) => true,
        };

        Ok(Self {
            bind_address,
            log_level,
            token_secret,
            processing_delay,
            species_latency,
            dna_latency,
            seed_demo_data,
            cors_origin,
        })
    }

    /// A hermetic configuration with seeded data and no artificial latency.
    pub fn for_tests() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: Level::DEBUG,
            token_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            processing_delay: Duration::from_millis(50),
            species_latency: Duration::ZERO,
            dna_latency: Duration::ZERO,
            seed_demo_data: true,
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Settings for the `oceanus` terminal client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub log_level: Level,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_url = std::env::var("OCEANUS_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let session_file = std::env::var("OCEANUS_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.oceanus-session.json"));

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_file,
            log_level: log_level_from_env()?,
        })
    }
}

fn log_level_from_env() -> Result<Level, ConfigError> {
    let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
    log_level_str.parse::<Level>().map_err(|_| {
        ConfigError::InvalidValue(
            "RUST_LOG".to_string(),
            format!("'{}' is not a valid log level", log_level_str),
        )
    })
}

fn millis_from_env(var: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}
