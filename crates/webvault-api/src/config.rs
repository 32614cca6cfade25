//! Application configuration.
//!
//! All environment reads happen here, once, at startup. Nothing below the
//! handler layer consults the environment, which keeps the query/listing
//! core testable without environment stubbing.

use std::net::SocketAddr;

use webvault_core::{Error, Result};

/// Default origins allowed for CORS when ALLOWED_ORIGINS is unset.
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind address for the HTTP server.
    pub bind_addr: SocketAddr,
    /// Comma-separated CORS origin whitelist, already split.
    pub allowed_origins: Vec<String>,
    /// Path of the asset the favicon proxy redirects to on total failure.
    pub default_favicon_asset: String,
    /// Log output format: "text" or "json".
    pub log_format: String,
    /// Optional log file path (enables daily-rotated file logging).
    pub log_file: Option<String>,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL is not set".to_string()))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid HOST/PORT: {}", e)))?;

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let default_favicon_asset = std::env::var("DEFAULT_FAVICON_ASSET")
            .unwrap_or_else(|_| "/assets/default-favicon.png".to_string());

        let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let log_file = std::env::var("LOG_FILE").ok();

        Ok(Self {
            database_url,
            bind_addr,
            allowed_origins,
            default_favicon_asset,
            log_format,
            log_file,
        })
    }
}
