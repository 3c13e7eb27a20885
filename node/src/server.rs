// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::extract::{Path, Request as AxumRequest, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use punchclock_kernel::proof::LedgerProof;
use punchclock_kernel::state::command::Command;
use punchclock_kernel::types::LeafIndex;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::api::*;
use crate::engine::{CommitReceipt, Engine};
use crate::errors::EngineError;
use crate::network::{OracleAttestation, OracleClient};

pub type SharedEngine = Arc<Mutex<Engine>>;

#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
    /// Oracle fetches run without holding the engine lock.
    pub oracle: Option<OracleClient>,
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(state: AppState, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        .route("/v1/server/init", post(init_server))
        .route("/v1/workers", post(add_worker))
        .route("/v1/workers/punch", post(punch))
        .route("/v1/workers/:leaf", get(get_worker))
        .route("/v1/root", get(get_root))
        .route("/v1/oracle/verify", post(verify_oracle))
        .route("/v1/oracle/time", get(oracle_time))
        .route("/v1/proof/state", get(get_proof))
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    app.layer(CorsLayer::permissive())
}

async fn init_server(
    State(state): State<AppState>,
    Json(req): Json<InitServerRequest>,
) -> Result<Json<CommitReceipt>, EngineError> {
    let mut engine = state.engine.lock().await;
    let receipt = engine.submit(Command::InitServerKey { server_key: req.server_key })?;
    Ok(Json(receipt))
}

async fn add_worker(
    State(state): State<AppState>,
    Json(req): Json<AddWorkerRequest>,
) -> Result<Json<CommitReceipt>, EngineError> {
    let mut engine = state.engine.lock().await;
    Ok(Json(engine.submit(req.into())?))
}

async fn punch(
    State(state): State<AppState>,
    Json(req): Json<PunchRequest>,
) -> Result<Json<CommitReceipt>, EngineError> {
    let mut engine = state.engine.lock().await;
    Ok(Json(engine.submit(req.into())?))
}

async fn get_worker(
    State(state): State<AppState>,
    Path(leaf): Path<u32>,
) -> Result<Json<WorkerResponse>, EngineError> {
    let engine = state.engine.lock().await;
    let index = LeafIndex(leaf);
    Ok(Json(WorkerResponse {
        leaf,
        record: engine.record(index)?,
        witness: engine.witness(index)?,
        root: engine.current_root(),
    }))
}

async fn get_root(State(state): State<AppState>) -> Json<RootResponse> {
    let engine = state.engine.lock().await;
    let server_key = engine.server_key();
    Json(RootResponse {
        root: engine.current_root(),
        version: engine.version(),
        server_key: (!server_key.is_unset()).then_some(server_key),
        oracle_key: engine.oracle_key(),
        event_count: engine.event_count(),
    })
}

async fn verify_oracle(
    State(state): State<AppState>,
    Json(req): Json<OracleVerifyRequest>,
) -> Json<OracleVerifyResponse> {
    let engine = state.engine.lock().await;
    Json(OracleVerifyResponse {
        valid: engine.verify_oracle(req.time, &req.signature),
    })
}

async fn oracle_time(State(state): State<AppState>) -> Result<Json<OracleAttestation>, EngineError> {
    let oracle = state
        .oracle
        .as_ref()
        .ok_or_else(|| EngineError::Config("no oracle URL configured".to_string()))?;
    Ok(Json(oracle.fetch().await?))
}

async fn get_proof(State(state): State<AppState>) -> Json<LedgerProof> {
    let engine = state.engine.lock().await;
    Json(engine.proof())
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
