// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use punchclock_kernel::auth::validate_public_key;
use punchclock_kernel::types::PublicKey;

use crate::errors::EngineError;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Bearer token required on every route when set.
    pub auth_token: Option<String>,
    /// Durable event log. Without it the ledger lives in memory only.
    pub event_log_path: Option<PathBuf>,
    /// Fixed for the lifetime of the ledger.
    pub oracle_key: PublicKey,
    pub oracle_url: Option<String>,
    pub oracle_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            auth_token: None,
            event_log_path: None,
            oracle_key: PublicKey::UNSET,
            oracle_url: None,
            oracle_timeout: Duration::from_millis(5_000),
        }
    }
}

impl NodeConfig {
    /// Reads `PUNCHCLOCK_*` variables on top of the defaults.
    /// `PUNCHCLOCK_ORACLE_KEY` is mandatory.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("PUNCHCLOCK_BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| EngineError::Config(format!("PUNCHCLOCK_BIND_ADDR: {e}")))?;
        }
        cfg.auth_token = lookup("PUNCHCLOCK_AUTH_TOKEN").filter(|t| !t.is_empty());
        cfg.event_log_path = lookup("PUNCHCLOCK_EVENT_LOG").map(PathBuf::from);
        cfg.oracle_url = lookup("PUNCHCLOCK_ORACLE_URL");

        let oracle_key = lookup("PUNCHCLOCK_ORACLE_KEY")
            .ok_or_else(|| EngineError::Config("PUNCHCLOCK_ORACLE_KEY is required".to_string()))?;
        cfg.oracle_key = PublicKey::from_hex(oracle_key.trim())
            .map_err(|e| EngineError::Config(format!("PUNCHCLOCK_ORACLE_KEY: {e}")))?;
        validate_public_key(&cfg.oracle_key)
            .map_err(|e| EngineError::Config(format!("PUNCHCLOCK_ORACLE_KEY: {e}")))?;

        if let Some(ms) = lookup("PUNCHCLOCK_ORACLE_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| EngineError::Config(format!("PUNCHCLOCK_ORACLE_TIMEOUT_MS: {e}")))?;
            cfg.oracle_timeout = Duration::from_millis(ms);
        }

        Ok(cfg)
    }
}
