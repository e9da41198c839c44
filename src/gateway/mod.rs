//! Local gateway
//!
//! Simulates, in-process, the API gateway that would sit in front of the
//! deployed functions. Every call to [`LocalGateway::dispatch`] returns a
//! well-formed [`Response`](crate::Response); routing misses, bad input and
//! handler failures all become status codes.

mod dispatch;

use std::sync::Arc;

use crate::app::App;
use crate::config::GatewayConfig;

/// Gateway over a frozen [`App`]
///
/// Cheap to clone and safe to share between threads: the route table is
/// read-only and each dispatch works on its own request value.
#[derive(Debug, Clone)]
pub struct LocalGateway {
    app: Arc<App>,
    config: Arc<GatewayConfig>,
    access_log_format: Option<Arc<str>>,
}

impl LocalGateway {
    pub fn new(app: App, config: GatewayConfig) -> Self {
        Self {
            app: Arc::new(app),
            config: Arc::new(config),
            access_log_format: None,
        }
    }

    /// Emit one access log line per dispatch in the given format
    #[must_use]
    pub fn with_access_log(mut self, format: &str) -> Self {
        self.access_log_format = Some(Arc::from(format));
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Convenience for `dispatch` calls without headers
pub const NO_HEADERS: [(&str, &str); 0] = [];
