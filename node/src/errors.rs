// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use punchclock_kernel::error::LedgerError;
use serde_json::json;
use thiserror::Error;

use crate::events::event_log::EventLogError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("Event log: {0}")]
    EventLog(#[from] EventLogError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable machine-readable kind, returned as `code` in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Ledger(err) => match err {
                LedgerError::AlreadyInitialized => "already_initialized",
                LedgerError::UnauthorizedWorker => "unauthorized_worker",
                LedgerError::UnauthorizedServer => "unauthorized_server",
                LedgerError::UnauthorizedOracle => "unauthorized_oracle",
                LedgerError::InvalidWitness => "invalid_witness",
                LedgerError::StaleRoot => "stale_root",
                LedgerError::NonMonotonicTime { .. } => "non_monotonic_time",
                LedgerError::DurationOverflow => "duration_overflow",
                LedgerError::LeafOutOfRange(_) => "leaf_out_of_range",
                LedgerError::InvalidPublicKey => "invalid_public_key",
                LedgerError::MirrorDiverged => "mirror_diverged",
                LedgerError::ReplayDiverged { .. } => "replay_diverged",
                LedgerError::Log(_) => "event_log",
            },
            EngineError::EventLog(_) => "event_log",
            EngineError::Network(_) => "network",
            EngineError::Config(_) => "config",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::Ledger(err) => match err {
                LedgerError::AlreadyInitialized | LedgerError::StaleRoot => StatusCode::CONFLICT,
                LedgerError::UnauthorizedWorker
                | LedgerError::UnauthorizedServer
                | LedgerError::UnauthorizedOracle => StatusCode::UNAUTHORIZED,
                LedgerError::InvalidWitness
                | LedgerError::NonMonotonicTime { .. }
                | LedgerError::DurationOverflow
                | LedgerError::LeafOutOfRange(_)
                | LedgerError::InvalidPublicKey => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerError::MirrorDiverged | LedgerError::ReplayDiverged { .. } | LedgerError::Log(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            EngineError::EventLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::Network(_) => StatusCode::BAD_GATEWAY,
            EngineError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
