//! In-process gateway for route-based handlers
//!
//! Declare routes on an [`App`], wrap it in a [`LocalGateway`] and call
//! [`LocalGateway::dispatch`] with literal method, path, headers and body.
//! Every call yields a [`Response`]; nothing touches the network.
//!
//! ```
//! use local_gateway::{App, GatewayConfig, LocalGateway, NO_HEADERS};
//! use local_gateway::hyper::Method;
//! use serde_json::json;
//!
//! let mut app = App::new("docs");
//! app.route("/hello/{name}", &[Method::GET], |req| {
//!     Ok(json!({ "hello": req.uri_param("name") }).into())
//! })
//! .unwrap();
//!
//! let gateway = LocalGateway::new(app, GatewayConfig::default());
//! let response = gateway.dispatch("GET", "/hello/alice", NO_HEADERS, "");
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.json::<serde_json::Value>().unwrap(), json!({"hello": "alice"}));
//! ```

pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logger;
mod routing;
pub mod server;

pub use app::{App, Reply, Request, RouteSpec};
pub use config::{Config, GatewayConfig};
pub use error::{HandlerError, RouteError};
pub use gateway::{LocalGateway, NO_HEADERS};
pub use http::Response;

pub use hyper;
