//! Sample application
//!
//! Three routes: a literal index, a placeholder greeting, and a JSON echo.
//! The binary serves it, and the integration tests exercise it.

use hyper::Method;
use serde_json::json;

use crate::app::{App, Reply, Request};
use crate::error::{HandlerError, RouteError};

pub fn app() -> Result<App, RouteError> {
    let mut app = App::new("local-gateway-demo");
    app.route("/", &[Method::GET], index)?
        .route("/hello/{name}", &[Method::GET], hello_name)?
        .route("/users", &[Method::POST], create_user)?;
    Ok(app)
}

fn index(_: &Request) -> Result<Reply, HandlerError> {
    Ok(json!({"hello": "world"}).into())
}

// '/hello/james' -> {"hello": "james"}
fn hello_name(req: &Request) -> Result<Reply, HandlerError> {
    let name = req
        .uri_param("name")
        .ok_or_else(|| HandlerError::BadRequest("missing name".to_string()))?;
    Ok(json!({ "hello": name }).into())
}

/// Echo the decoded JSON body back under a `user` key
fn create_user(req: &Request) -> Result<Reply, HandlerError> {
    Ok(json!({ "user": req.json_body() }).into())
}
