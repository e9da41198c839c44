//! HTTP response building module
//!
//! `Response` is the value every dispatch produces. The `build_*` helpers
//! cover the gateway's fixed responses and are decoupled from routing.

use std::borrow::Cow;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ALLOW,
    CONTENT_LENGTH, CONTENT_TYPE, SERVER,
};
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::logger;

const JSON: &str = "application/json";
const CORS_ALLOW_HEADERS: &str = "Authorization,Content-Type,X-Api-Key";

/// Simulated gateway response: status, headers, body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Header value as text; lookup is case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Convert into a hyper response for the development server
    pub fn into_hyper(self, server_name: &str) -> hyper::Response<Full<Bytes>> {
        let status = self.status;
        let content_length = self.body.len();
        let mut builder = hyper::Response::builder()
            .status(status)
            .header(CONTENT_LENGTH, content_length);
        if let Ok(value) = HeaderValue::from_str(server_name) {
            builder = builder.header(SERVER, value);
        }
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }

        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            hyper::Response::new(Full::new(Bytes::new()))
        })
    }
}

/// Build a JSON response; serialization failures degrade to a generic 500
pub fn build_json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(json) => Response::new(status)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(JSON))
            .with_body(json),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "An internal server error occurred.",
            )
        }
    }
}

/// Build an error response with a `{"Code": ..., "Message": ...}` body
pub fn build_error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "Code": code,
        "Message": message,
    });
    Response::new(status)
        .with_header(CONTENT_TYPE, HeaderValue::from_static(JSON))
        .with_body(body.to_string())
}

/// Build 404 Not Found response
pub fn build_404_response(path: &str) -> Response {
    build_error_response(
        StatusCode::NOT_FOUND,
        "NotFoundError",
        &format!("No route matches {path}"),
    )
}

/// Build 405 Method Not Allowed response with an `Allow` header
pub fn build_405_response(method: &Method, allowed: &[Method]) -> Response {
    let response = build_error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "MethodNotAllowedError",
        &format!("Method {method} is not allowed for this resource"),
    );
    match HeaderValue::from_str(&join_methods(allowed)) {
        Ok(value) => response.with_header(ALLOW, value),
        Err(e) => {
            log_build_error("405", &e);
            response
        }
    }
}

/// Build 413 Payload Too Large response
pub fn build_413_response(limit: usize) -> Response {
    build_error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        "RequestEntityTooLargeError",
        &format!("Request body exceeds the {limit} byte limit"),
    )
}

/// Build CORS preflight response (OPTIONS request)
pub fn build_preflight_response(allowed: &[Method]) -> Response {
    let mut methods = allowed.to_vec();
    if !methods.contains(&Method::OPTIONS) {
        methods.push(Method::OPTIONS);
    }
    let mut response = Response::new(StatusCode::OK);
    if let Ok(value) = HeaderValue::from_str(&join_methods(&methods)) {
        response.headers.insert(ALLOW, value.clone());
        response.headers.insert(ACCESS_CONTROL_ALLOW_METHODS, value);
    }
    apply_cors_headers(&mut response);
    response.with_header(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("600"))
}

/// Add the permissive CORS headers used by CORS-enabled routes
pub fn apply_cors_headers(response: &mut Response) {
    response
        .headers
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response.headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_build_error(label: &str, err: &impl std::fmt::Display) {
    logger::log_error(&format!("Failed to build {label} response: {err}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_json_response() {
        let resp = build_json_response(StatusCode::OK, &json!({"hello": "world"}));
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.json::<Value>().unwrap(), json!({"hello": "world"}));
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let resp = build_405_response(&Method::PUT, &[Method::GET, Method::POST]);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.header("Allow"), Some("GET, POST"));
        let body: Value = resp.json().unwrap();
        assert_eq!(body["Code"], "MethodNotAllowedError");
    }

    #[test]
    fn test_preflight_includes_options() {
        let resp = build_preflight_response(&[Method::GET]);
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.header("access-control-allow-methods"), Some("GET, OPTIONS"));
        assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
        assert!(resp.body().is_empty());
    }

    #[test]
    fn test_into_hyper_keeps_headers() {
        let resp = build_404_response("/nope").into_hyper("local-gateway");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[SERVER], "local-gateway");
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    }
}
