//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use friendcrm_shared::Tenancy;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: none (the platform data directory is used).
    pub database_path: Option<PathBuf>,

    /// Whether friends are partitioned per principal.
    /// Env: `MULTI_TENANT` (true/false)
    /// Default: `true`
    pub multi_tenant: bool,

    /// Header carrying the principal id set by the upstream auth proxy.
    /// Env: `PRINCIPAL_HEADER`
    /// Default: `x-user-id`
    pub principal_header: String,

    /// Env: `REQUEST_TIMEOUT_SECS`
    /// Default: `10`
    pub request_timeout: Duration,

    /// How long a write waits on a locked database.
    /// Env: `DB_BUSY_TIMEOUT_MS`
    /// Default: `5000`
    pub db_busy_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            database_path: None,
            multi_tenant: true,
            principal_header: "x-user-id".to_string(),
            request_timeout: Duration::from_secs(10),
            db_busy_timeout: Duration::from_millis(5000),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = var("DATABASE_PATH") {
            if !path.trim().is_empty() {
                config.database_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = var("MULTI_TENANT") {
            config.multi_tenant = val != "false" && val != "0";
        }

        if let Some(header) = var("PRINCIPAL_HEADER") {
            let header = header.trim().to_ascii_lowercase();
            if header.is_empty() {
                tracing::warn!("Empty PRINCIPAL_HEADER, using default");
            } else {
                config.principal_header = header;
            }
        }

        if let Some(val) = var("REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid REQUEST_TIMEOUT_SECS, using default"),
            }
        }

        if let Some(val) = var("DB_BUSY_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.db_busy_timeout = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %val, "Invalid DB_BUSY_TIMEOUT_MS, using default"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    pub fn tenancy(&self) -> Tenancy {
        if self.multi_tenant {
            Tenancy::Multi
        } else {
            Tenancy::Single
        }
    }
}
