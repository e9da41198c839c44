//! Application definition
//!
//! An `App` is the route declaration surface: handlers are registered
//! against (method, path template) pairs before any request is dispatched.
//! Once handed to a [`LocalGateway`](crate::LocalGateway) it is frozen.

mod reply;
mod request;

use std::fmt;
use std::sync::Arc;

use hyper::Method;

use crate::error::{HandlerError, RouteError};
use crate::http::content_type::DEFAULT_CONTENT_TYPES;
use crate::routing::{PathPattern, RouteTable};

pub use reply::Reply;
pub use request::Request;

/// Shared handler function
pub type Handler = Arc<dyn Fn(&Request) -> Result<Reply, HandlerError> + Send + Sync>;

/// Per-method route entry stored in the route table
#[derive(Clone)]
pub(crate) struct RouteEntry {
    pub handler: Handler,
    pub content_types: Vec<String>,
    pub cors: bool,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("content_types", &self.content_types)
            .field("cors", &self.cors)
            .finish_non_exhaustive()
    }
}

/// Full route declaration
///
/// ```
/// use local_gateway::{App, Reply, RouteSpec};
/// use local_gateway::hyper::Method;
///
/// let mut app = App::new("docs");
/// app.register(
///     RouteSpec::new("/users")
///         .method(Method::POST)
///         .cors(true)
///         .handler(|req| Ok(Reply::Json(req.json_body().cloned().unwrap_or_default()))),
/// )
/// .unwrap();
/// ```
pub struct RouteSpec {
    path: String,
    methods: Vec<Method>,
    content_types: Vec<String>,
    cors: bool,
    handler: Option<Handler>,
}

impl RouteSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            methods: Vec::new(),
            content_types: DEFAULT_CONTENT_TYPES.iter().map(ToString::to_string).collect(),
            cors: false,
            handler: None,
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    #[must_use]
    pub fn methods(self, methods: impl IntoIterator<Item = Method>) -> Self {
        methods.into_iter().fold(self, Self::method)
    }

    /// Accepted request content types; replaces the JSON default
    #[must_use]
    pub fn content_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.content_types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    #[must_use]
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Request) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }
}

/// Application: a named, immutable-after-freeze route table
pub struct App {
    name: String,
    routes: RouteTable<RouteEntry>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: RouteTable::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `handler` for `path` under each of `methods` (GET if empty)
    pub fn route<F>(&mut self, path: &str, methods: &[Method], handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&Request) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.register(
            RouteSpec::new(path)
                .methods(methods.iter().cloned())
                .handler(handler),
        )
    }

    pub fn register(&mut self, spec: RouteSpec) -> Result<&mut Self, RouteError> {
        let Some(handler) = spec.handler else {
            return Err(RouteError::MissingHandler { path: spec.path });
        };
        if spec.content_types.is_empty() {
            return Err(RouteError::NoContentTypes { path: spec.path });
        }

        let pattern = PathPattern::parse(&spec.path)?;
        let methods = if spec.methods.is_empty() {
            vec![Method::GET]
        } else {
            spec.methods
        };

        self.routes.insert(
            pattern,
            &methods,
            RouteEntry {
                handler,
                content_types: spec.content_types,
                cors: spec.cors,
            },
        )?;
        Ok(self)
    }

    pub(crate) const fn routes(&self) -> &RouteTable<RouteEntry> {
        &self.routes
    }

    /// `(methods, template)` for every resource, in registration order
    pub fn route_summary(&self) -> Vec<(Vec<Method>, String)> {
        self.routes
            .resources()
            .map(|r| (r.methods(), r.pattern().as_str().to_string()))
            .collect()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("routes", &self.route_summary())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_handler(_: &Request) -> Result<Reply, HandlerError> {
        Ok(json!({}).into())
    }

    #[test]
    fn test_route_defaults_to_get() {
        let mut app = App::new("test");
        app.route("/", &[], ok_handler).unwrap();
        assert_eq!(app.route_summary(), vec![(vec![Method::GET], "/".to_string())]);
    }

    #[test]
    fn test_route_chaining() {
        let mut app = App::new("test");
        app.route("/a", &[Method::GET], ok_handler)
            .and_then(|app| app.route("/a", &[Method::POST], ok_handler))
            .and_then(|app| app.route("/b/{id}", &[Method::PUT, Method::PUT], ok_handler))
            .unwrap();

        let summary = app.route_summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].0, vec![Method::GET, Method::POST]);
        assert_eq!(summary[1].0, vec![Method::PUT]);
    }

    #[test]
    fn test_missing_handler_rejected() {
        let mut app = App::new("test");
        let err = app
            .register(RouteSpec::new("/users").method(Method::POST))
            .unwrap_err();
        assert!(matches!(err, RouteError::MissingHandler { path } if path == "/users"));
    }

    #[test]
    fn test_empty_content_types_rejected() {
        let mut app = App::new("test");
        let err = app
            .register(
                RouteSpec::new("/upload")
                    .content_types(Vec::<String>::new())
                    .handler(ok_handler),
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::NoContentTypes { .. }));
    }

    #[test]
    fn test_invalid_and_duplicate_routes_rejected() {
        let mut app = App::new("test");
        assert!(matches!(
            app.route("no-slash", &[Method::GET], ok_handler),
            Err(RouteError::InvalidPattern { .. })
        ));

        app.route("/x", &[Method::GET], ok_handler).unwrap();
        assert!(matches!(
            app.route("/x", &[Method::GET], ok_handler),
            Err(RouteError::DuplicateRoute { .. })
        ));
    }
}
