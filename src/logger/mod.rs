//! Logger module
//!
//! Thin facade over `tracing`, used throughout the crate:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Nothing is printed until [`init`] installs a subscriber, so library users
//! (and tests) stay quiet unless they opt in.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;
use crate::config::{Config, LoggingConfig};

const ACCESS_TARGET: &str = "local_gateway::access";

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level`. Call once at startup.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Local gateway listening on http://{addr}");
    tracing::info!("Stage: {}", config.gateway.stage);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    tracing::info!("Max body size: {} bytes", config.gateway.max_body_size);
}

pub fn log_routes(app: &App) {
    let routes = app.route_summary();
    if routes.is_empty() {
        tracing::warn!("App '{}' has no routes", app.name());
        return;
    }
    for (methods, path) in routes {
        let methods = methods
            .iter()
            .map(hyper::Method::as_str)
            .collect::<Vec<_>>()
            .join(",");
        tracing::info!("Route: {methods:<12} {path}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_handler_failure(method: &str, path: &str, err: &impl std::fmt::Display) {
    tracing::error!(method, path, "Handler failed: {err}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!("Shutting down; {active_connections} connection(s) still open");
}
