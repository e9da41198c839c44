//! Request dispatch
//!
//! match -> decode -> invoke -> encode, one shot per call. No state survives
//! between calls.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, REFERER, USER_AGENT};
use hyper::{Method, StatusCode};
use serde_json::Value;

use super::LocalGateway;
use crate::app::{Reply, Request, RouteEntry};
use crate::error::DispatchError;
use crate::http::{self, content_type, Response};
use crate::logger::{self, AccessLogEntry};

impl LocalGateway {
    /// Simulate one request through the gateway
    ///
    /// `path` may carry a `?query` suffix. Header names are case-insensitive.
    /// This never panics on bad input: invalid methods, paths or headers give
    /// a 400 response.
    pub fn dispatch<I, K, V>(
        &self,
        method: &str,
        path: &str,
        headers: I,
        body: impl AsRef<[u8]>,
    ) -> Response
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let parsed = parse_method(method).and_then(|m| parse_headers(headers).map(|h| (m, h)));
        match parsed {
            Ok((method, headers)) => self.dispatch_parts(
                method,
                path,
                headers,
                Bytes::copy_from_slice(body.as_ref()),
                None,
            ),
            Err(err) => {
                let started = Instant::now();
                let entry = self.start_entry(method, path, None, None);
                let response = error_response(&err, method, path);
                self.finish_entry(entry, None, &response, started);
                response
            }
        }
    }

    /// Dispatch with already-typed request parts
    pub(crate) fn dispatch_parts(
        &self,
        method: Method,
        target: &str,
        headers: HeaderMap,
        body: Bytes,
        peer: Option<SocketAddr>,
    ) -> Response {
        let started = Instant::now();
        let entry = self.start_entry(method.as_str(), target, Some(&headers), peer);
        let (path, query) = split_target(target);

        let (route, outcome) = self.resolve(&method, path, query, headers, body);
        let response = outcome.unwrap_or_else(|err| error_response(&err, method.as_str(), path));

        self.finish_entry(entry, route, &response, started);
        response
    }

    fn resolve(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> (Option<&str>, Result<Response, DispatchError>) {
        if !path.starts_with('/') {
            let err = DispatchError::InvalidRequest("path must begin with '/'".to_string());
            return (None, Err(err));
        }

        let Some(found) = self.app.routes().lookup(path) else {
            let err = DispatchError::NotFound {
                path: path.to_string(),
            };
            return (None, Err(err));
        };
        let resource = found.resource;
        let route = Some(resource.pattern().as_str());

        let Some(entry) = resource.route(method) else {
            let cors = resource.entries().any(|e| e.cors);
            if cors && *method == Method::OPTIONS {
                return (route, Ok(http::build_preflight_response(&resource.methods())));
            }
            let err = DispatchError::MethodNotAllowed {
                method: method.clone(),
                allowed: resource.methods(),
            };
            if !cors {
                return (route, Err(err));
            }
            // CORS resources carry the headers on 405 as well
            let mut response = error_response(&err, method.as_str(), path);
            http::apply_cors_headers(&mut response);
            return (route, Ok(response));
        };

        let request = self.decode_body(entry, &headers, &body).map(|json_body| Request {
            method: method.clone(),
            path: path.to_string(),
            uri_params: found.params,
            query_params: parse_query(query),
            headers,
            json_body,
            raw_body: body,
            stage: self.config.stage.clone(),
        });

        let mut response = request
            .and_then(|request| invoke(entry, &request))
            .unwrap_or_else(|err| error_response(&err, method.as_str(), path));
        if entry.cors {
            http::apply_cors_headers(&mut response);
        }
        (route, Ok(response))
    }

    /// Decode a JSON body before the handler sees it
    fn decode_body(
        &self,
        entry: &RouteEntry,
        headers: &HeaderMap,
        body: &Bytes,
    ) -> Result<Option<Value>, DispatchError> {
        if body.is_empty() {
            return Ok(None);
        }
        if body.len() > self.config.max_body_size {
            return Err(DispatchError::PayloadTooLarge {
                size: body.len(),
                limit: self.config.max_body_size,
            });
        }

        let Some(value) = headers.get(CONTENT_TYPE) else {
            return Ok(None);
        };
        let media_type = value
            .to_str()
            .map(content_type::media_type)
            .map_err(|_| DispatchError::InvalidRequest("Content-Type is not valid text".into()))?;

        if !content_type::is_accepted(&media_type, &entry.content_types) {
            return Err(DispatchError::UnsupportedMediaType(media_type));
        }
        if !content_type::is_json(&media_type) {
            return Ok(None);
        }
        serde_json::from_slice(body)
            .map(Some)
            .map_err(DispatchError::MalformedBody)
    }

    fn start_entry(
        &self,
        method: &str,
        target: &str,
        headers: Option<&HeaderMap>,
        peer: Option<SocketAddr>,
    ) -> Option<AccessLogEntry> {
        self.access_log_format.as_ref()?;

        let (path, query) = split_target(target);
        let mut entry = AccessLogEntry::new(method, path);
        entry.query = query.map(ToString::to_string);
        entry.stage.clone_from(&self.config.stage);
        if let Some(peer) = peer {
            entry.remote_addr = peer.ip().to_string();
        }
        if let Some(headers) = headers {
            entry.referer = header_text(headers, &REFERER);
            entry.user_agent = header_text(headers, &USER_AGENT);
        }
        Some(entry)
    }

    fn finish_entry(
        &self,
        entry: Option<AccessLogEntry>,
        route: Option<&str>,
        response: &Response,
        started: Instant,
    ) {
        let (Some(mut entry), Some(format)) = (entry, self.access_log_format.as_deref()) else {
            return;
        };
        entry.route = route.map(ToString::to_string);
        entry.status = response.status_code();
        entry.body_bytes = response.body().len();
        entry.elapsed = started.elapsed();
        logger::log_access(&entry, format);
    }
}

/// Run the handler, turning panics and handler errors into `DispatchError`
fn invoke(entry: &RouteEntry, request: &Request) -> Result<Response, DispatchError> {
    let reply = panic::catch_unwind(AssertUnwindSafe(|| (entry.handler)(request)))
        .map_err(|payload| DispatchError::HandlerPanicked(panic_message(payload.as_ref())))??;

    Ok(match reply {
        Reply::Json(value) => http::build_json_response(StatusCode::OK, &value),
        Reply::Response(response) => response,
    })
}

fn error_response(err: &DispatchError, method: &str, path: &str) -> Response {
    match err {
        DispatchError::NotFound { path } => http::build_404_response(path),
        DispatchError::MethodNotAllowed { method, allowed } => {
            http::build_405_response(method, allowed)
        }
        DispatchError::PayloadTooLarge { limit, .. } => http::build_413_response(*limit),
        other => {
            if other.status().is_server_error() {
                logger::log_handler_failure(method, path, other);
            }
            http::build_error_response(other.status(), other.code(), &other.public_message())
        }
    }
}

fn parse_method(method: &str) -> Result<Method, DispatchError> {
    if method.is_empty() {
        return Err(DispatchError::InvalidRequest("method must not be empty".into()));
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|_| DispatchError::InvalidRequest(format!("invalid method '{method}'")))
}

fn parse_headers<I, K, V>(headers: I) -> Result<HeaderMap, DispatchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let (name, value) = (name.as_ref(), value.as_ref());
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| DispatchError::InvalidRequest(format!("invalid header name '{name}'")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| DispatchError::InvalidRequest(format!("invalid value for header '{name}'")))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
