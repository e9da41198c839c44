use std::sync::Arc;

use local_gateway::config::Config;
use local_gateway::server::{self, ServerState};
use local_gateway::{demo, logger, LocalGateway};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Size the runtime from the workers setting, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let app = demo::app()?;
    logger::log_routes(&app);

    let mut gateway = LocalGateway::new(app, cfg.gateway.clone());
    if cfg.logging.access_log {
        gateway = gateway.with_access_log(&cfg.logging.access_log_format);
    }

    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(ServerState::new(gateway, cfg.performance.clone()));
    server::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for shutdown signal: {e}"));
        }
    })
    .await;

    Ok(())
}
