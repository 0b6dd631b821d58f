//! Telemetry configuration from environment variables.

use crate::TelemetryError;
use std::env;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error, or a full directive)
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (mainnet, testnet, localnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "vpurse".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "localnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VPURSE_SERVICE_NAME`: Service name (default: vpurse)
    /// - `VPURSE_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `VPURSE_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `VPURSE_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `VPURSE_NETWORK`: Network name (default: localnet)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("VPURSE_SERVICE_NAME").unwrap_or_else(|_| "vpurse".to_string()),

            log_level: env::var("VPURSE_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("VPURSE_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("VPURSE_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),

            network: env::var("VPURSE_NETWORK").unwrap_or_else(|_| "localnet".to_string()),
        }
    }

    /// Parse `log_level` into a filter.
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        EnvFilter::try_new(&self.log_level).map_err(|e| TelemetryError::Config(e.to_string()))
    }
}
