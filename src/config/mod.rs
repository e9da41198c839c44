// Configuration module entry point
// Loads layered configuration: file, then environment, then defaults

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{Config, GatewayConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable prefix, e.g. `GATEWAY__SERVER__PORT=9000`
const ENV_PREFIX: &str = "GATEWAY";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from an in-memory TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        let defaults = GatewayConfig::default();
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.request_timeout", 30)?
            .set_default("gateway.stage", defaults.stage)?
            .set_default(
                "gateway.max_body_size",
                i64::try_from(defaults.max_body_size).unwrap_or(i64::MAX),
            )?
            .set_default("gateway.server_name", defaults.server_name)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_file() {
        let cfg = Config::load_from("does-not-exist").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.performance.request_timeout, 30);
        assert_eq!(cfg.gateway, GatewayConfig::default());
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            port = 9000
            workers = 2

            [performance]
            max_connections = 16

            [gateway]
            stage = "dev"
            max_body_size = 1024
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.performance.max_connections, Some(16));
        assert_eq!(cfg.gateway.stage, "dev");
        assert_eq!(cfg.gateway.max_body_size, 1024);
        assert_eq!(cfg.gateway.server_name, "local-gateway");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_gateway_section_deserializes_from_toml() {
        let gateway: GatewayConfig = toml::from_str(r#"stage = "prod""#).unwrap();
        assert_eq!(gateway.stage, "prod");
        assert_eq!(gateway.max_body_size, GatewayConfig::default().max_body_size);
    }
}
