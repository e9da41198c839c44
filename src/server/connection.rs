// Connection handling module
// Serves one TCP connection and bridges its requests into the gateway

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;

use super::ServerState;
use crate::gateway::LocalGateway;
use crate::http::{self, Response};
use crate::logger;

/// Accept a connection, enforcing the connection limit.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve a single connection in a spawned task.
///
/// HTTP/1.1 with keep-alive when configured, bounded by `request_timeout`.
/// The connection counter is decremented when the task ends.
fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<ServerState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = Duration::from_secs(state.performance.request_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.performance.keep_alive_timeout > 0);

        let gateway = state.gateway.clone();
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handle_request(req, gateway.clone(), peer_addr)),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Collect the request body and hand the request to the gateway
async fn handle_request(
    req: hyper::Request<Incoming>,
    gateway: LocalGateway,
    peer_addr: SocketAddr,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let server_name = gateway.config().server_name.clone();
    let limit = gateway.config().max_body_size;

    if let Some(resp) = check_body_size(&req, limit) {
        return Ok(resp.into_hyper(&server_name));
    }

    let (parts, body) = req.into_parts();
    let body = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Ok(http::build_413_response(limit).into_hyper(&server_name));
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body from {peer_addr}: {e}"));
            let resp = http::build_error_response(
                StatusCode::BAD_REQUEST,
                "BadRequestError",
                "Could not read request body",
            );
            return Ok(resp.into_hyper(&server_name));
        }
    };

    let target = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), hyper::http::uri::PathAndQuery::as_str);
    let response = gateway.dispatch_parts(parts.method, target, parts.headers, body, Some(peer_addr));
    Ok(response.into_hyper(&server_name))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &hyper::Request<Incoming>, max_body_size: usize) -> Option<Response> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<usize>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response(max_body_size))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
