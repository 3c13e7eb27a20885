// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Replay - Authoritative Recovery
//!
//! # Recovery Protocol
//! 1. Read the whole event log (missing file = genesis)
//! 2. Decode every frame, failing closed on damage
//! 3. Re-apply every command from genesis, checking each `root_after`
//! 4. Hand back ledger, mirror and the raw bytes for proof hashing

use std::path::Path;
use std::time::Instant;

use punchclock_kernel::mirror::{MemoryRecordStore, Mirror};
use punchclock_kernel::replay::{replay_log, LogHeader};
use punchclock_kernel::state::ledger::LedgerState;
use punchclock_kernel::types::PublicKey;

use crate::events::event_log::{EventLogError, Result};

pub struct Recovered {
    pub ledger: LedgerState,
    pub mirror: Mirror<MemoryRecordStore>,
    pub event_count: u64,
    /// Log bytes exactly as they are (or will be) on disk.
    pub log_bytes: Vec<u8>,
}

pub fn recover_from_event_log(path: &Path, oracle_key: PublicKey) -> Result<Recovered> {
    let start = Instant::now();

    let log_bytes = match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => LogHeader::current().to_bytes().to_vec(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No event log at {:?}, starting from genesis", path);
            LogHeader::current().to_bytes().to_vec()
        }
        Err(e) => return Err(e.into()),
    };

    let (ledger, mirror, event_count) = replay_log(oracle_key, &log_bytes).map_err(EventLogError::Corrupt)?;

    metrics::histogram!("punchclock_replay_duration_seconds", start.elapsed().as_secs_f64());
    tracing::info!(
        events = event_count,
        root = %ledger.current_root(),
        "Recovered ledger from {:?}",
        path
    );

    Ok(Recovered {
        ledger,
        mirror,
        event_count,
        log_bytes,
    })
}
