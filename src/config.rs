//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    #[error("Failed to load environment variables: {0}")]
    EnvLoad(#[from] dotenvy::Error),

    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Railway/Docker
            port: 3000,
        }
    }
}

/// Governance thresholds and rollup limits
#[derive(Debug, Clone, Deserialize)]
pub struct GovernanceConfig {
    /// Days since the last qualifying action after which a waiting PR is
    /// reclassified as stalled (boundary inclusive)
    pub stall_threshold_days: i64,
    /// Default trailing activity window for trending queries
    pub trending_window_days: i64,
    /// Upper bound on concurrent per-PR work in batch rollups
    pub max_concurrent_rollups: usize,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            stall_threshold_days: 60,
            trending_window_days: 7,
            max_concurrent_rollups: 8,
        }
    }
}

impl GovernanceConfig {
    pub fn stall_threshold(&self) -> chrono::Duration {
        chrono::Duration::days(self.stall_threshold_days)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Snapshot files exported by the upstream event-log collaborator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventLogConfig {
    pub snapshot_path: Option<PathBuf>,
    pub roles_path: Option<PathBuf>,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub governance: GovernanceConfig,
    pub cors: CorsConfig,
    pub event_log: EventLogConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let defaults = GovernanceConfig::default();
        let governance = GovernanceConfig {
            stall_threshold_days: std::env::var("STALL_THRESHOLD_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.stall_threshold_days),
            trending_window_days: std::env::var("TRENDING_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.trending_window_days),
            max_concurrent_rollups: std::env::var("MAX_CONCURRENT_ROLLUPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_rollups),
        };

        if governance.stall_threshold_days < 1 {
            return Err(ConfigError::InvalidValue(
                "STALL_THRESHOLD_DAYS must be at least 1".to_string(),
            ));
        }
        if governance.max_concurrent_rollups == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_CONCURRENT_ROLLUPS must be at least 1".to_string(),
            ));
        }

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let event_log = EventLogConfig {
            snapshot_path: std::env::var("EVENT_LOG_PATH").ok().map(PathBuf::from),
            roles_path: std::env::var("ROLES_PATH").ok().map(PathBuf::from),
        };

        Ok(Self {
            server,
            governance,
            cors,
            event_log,
        })
    }
}
