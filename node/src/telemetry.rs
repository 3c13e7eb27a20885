// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::EngineError;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> Result<(), EngineError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "punchclock_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| EngineError::Config(format!("tracing: {e}")))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EngineError::Config(format!("prometheus: {e}")))?;

    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!("punchclock_transitions_total", "Commands committed, by kind");
    metrics::describe_counter!("punchclock_rejections_total", "Commands rejected before the log, by kind");
    metrics::describe_histogram!("punchclock_commit_duration_seconds", "Time from prepare to mirrored commit");
    metrics::describe_gauge!("punchclock_ledger_version", "Number of commits applied to the ledger");
    metrics::describe_counter!("punchclock_proofs_generated_total", "Ledger proofs served");
    metrics::describe_histogram!("punchclock_replay_duration_seconds", "Time taken to replay the event log");

    metrics::gauge!("punchclock_node_up", 1.0);
    Ok(())
}

/// Prometheus text for `/metrics`.
pub fn get_metrics() -> String {
    match PROM_HANDLE.get() {
        Some(handle) => handle.render(),
        None => "# metrics not initialized".to_string(),
    }
}
