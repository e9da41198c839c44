// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Development server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Connection handling for the development server
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Upper bound in seconds for serving one connection
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Settings the dispatcher itself consults
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Stage name exposed to handlers
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Value of the `Server` header on development server responses
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_stage() -> String {
    "api".to_string()
}

// Lambda's synchronous invocation payload limit
const fn default_max_body_size() -> usize {
    6 * 1024 * 1024
}

#[allow(clippy::missing_const_for_fn)]
fn default_server_name() -> String {
    "local-gateway".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            stage: default_stage(),
            max_body_size: default_max_body_size(),
            server_name: default_server_name(),
        }
    }
}
