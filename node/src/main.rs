// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use punchclock_node::config::NodeConfig;
use punchclock_node::engine::Engine;
use punchclock_node::errors::EngineError;
use punchclock_node::network::OracleClient;
use punchclock_node::server::{build_router, AppState};
use punchclock_node::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Node stopped: {}", e);
        eprintln!("punchclock-node: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), EngineError> {
    init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!(
        bind_addr = %cfg.bind_addr,
        event_log = ?cfg.event_log_path,
        oracle_key = %cfg.oracle_key,
        auth = cfg.auth_token.is_some(),
        "Initializing punchclock node"
    );

    let engine = Engine::new(&cfg)?;
    tracing::info!(
        root = %engine.current_root(),
        events = engine.event_count(),
        "Ledger ready"
    );

    let oracle = match &cfg.oracle_url {
        Some(url) => Some(OracleClient::new(url, cfg.oracle_key, cfg.oracle_timeout)?),
        None => None,
    };

    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        oracle,
    };
    let app = build_router(state, cfg.auth_token.clone());

    tracing::info!("Listening on {}", cfg.bind_addr);
    let listener = TcpListener::bind(cfg.bind_addr)
        .await
        .map_err(|e| EngineError::Config(format!("bind {}: {e}", cfg.bind_addr)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| EngineError::Network(e.to_string()))
}
