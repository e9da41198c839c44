// Development server module
// Serves a LocalGateway over HTTP/1.1 on a loopback listener

pub mod connection;
pub mod listener;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::PerformanceConfig;
use crate::gateway::LocalGateway;
use crate::logger;

pub use listener::bind_listener;

/// State shared by every connection task
pub struct ServerState {
    pub gateway: LocalGateway,
    pub performance: PerformanceConfig,
    pub active_connections: AtomicUsize,
}

impl ServerState {
    pub const fn new(gateway: LocalGateway, performance: PerformanceConfig) -> Self {
        Self {
            gateway,
            performance,
            active_connections: AtomicUsize::new(0),
        }
    }
}

/// Accept connections until `shutdown` resolves
///
/// Connections already in flight keep running on their own tasks.
pub async fn serve<F>(listener: TcpListener, state: Arc<ServerState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));
                return;
            }
        }
    }
}
