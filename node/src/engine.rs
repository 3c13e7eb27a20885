// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The node's ledger engine.
//!
//! Commit barrier for every command:
//! 1. `prepare` against the live ledger (all checks, no writes)
//! 2. append the event to the log and fsync
//! 3. compare-and-commit the root
//! 4. mirror the transition and check sync
//!
//! A command that fails step 1 never reaches the log.

use std::time::Instant;

use punchclock_kernel::auth;
use punchclock_kernel::event::LedgerEvent;
use punchclock_kernel::merkle::Witness;
use punchclock_kernel::mirror::{check_sync, MemoryRecordStore, Mirror};
use punchclock_kernel::proof::{HashReceiptBackend, LedgerProof, ProofBackend, TransitionStatement};
use punchclock_kernel::replay::LogHeader;
use punchclock_kernel::state::command::Command;
use punchclock_kernel::state::ledger::{LedgerState, Transition};
use punchclock_kernel::types::{Digest, LeafIndex, PublicKey, Signature, Version, Worker};
use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::events::{recover_from_event_log, EventLogWriter};

/// What a client gets back for an accepted command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub kind: String,
    pub sequence: u64,
    pub prior_root: Digest,
    pub new_root: Digest,
    pub version: Version,
    /// Hash commitment to (prior_root, new_root, version).
    pub receipt: Digest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<LeafIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Worker>,
}

pub struct Engine {
    ledger: LedgerState,
    mirror: Mirror<MemoryRecordStore>,
    event_log: Option<EventLogWriter>,
    log_hasher: blake3::Hasher,
    event_count: u64,
    backend: HashReceiptBackend,
}

impl Engine {
    /// Recovers from the configured event log, or starts at genesis in memory.
    pub fn new(cfg: &NodeConfig) -> Result<Self, EngineError> {
        let mut log_hasher = blake3::Hasher::new();

        let Some(path) = &cfg.event_log_path else {
            tracing::warn!("No event log configured. Ledger state will not survive a restart.");
            log_hasher.update(&LogHeader::current().to_bytes());
            return Ok(Self {
                ledger: LedgerState::genesis(cfg.oracle_key),
                mirror: Mirror::new(MemoryRecordStore::new())?,
                event_log: None,
                log_hasher,
                event_count: 0,
                backend: HashReceiptBackend,
            });
        };

        let recovered = recover_from_event_log(path, cfg.oracle_key)?;
        let writer = EventLogWriter::open(path)?;
        if writer.event_count() != recovered.event_count {
            return Err(EngineError::Config(format!(
                "event log at {:?} changed during recovery",
                path
            )));
        }
        tracing::info!("Event log initialized at {:?}", path);

        log_hasher.update(&recovered.log_bytes);
        metrics::gauge!("punchclock_ledger_version", recovered.ledger.version().0 as f64);

        Ok(Self {
            ledger: recovered.ledger,
            mirror: recovered.mirror,
            event_log: Some(writer),
            log_hasher,
            event_count: recovered.event_count,
            backend: HashReceiptBackend,
        })
    }

    /// Runs one command through the commit barrier.
    pub fn submit(&mut self, cmd: Command) -> Result<CommitReceipt, EngineError> {
        let start = Instant::now();
        let kind = cmd.kind();
        let prior_root = self.ledger.current_root();

        let transition = match self.ledger.prepare(&cmd) {
            Ok(transition) => transition,
            Err(e) => {
                metrics::counter!("punchclock_rejections_total", 1, "kind" => kind);
                tracing::warn!(kind, "Command rejected: {}", e);
                return Err(e.into());
            }
        };

        let event = LedgerEvent {
            sequence: self.event_count,
            command: cmd,
            root_after: transition.root_after(prior_root),
        };
        let frame = match &mut self.event_log {
            Some(log) => log.append(&event)?,
            None => event.encode_frame()?,
        };

        self.ledger.commit(&transition)?;
        self.mirror.apply(&transition)?;
        check_sync(&self.ledger, &self.mirror)?;

        self.log_hasher.update(&frame);
        self.event_count += 1;

        let version = self.ledger.version();
        let new_root = self.ledger.current_root();
        let receipt = self.backend.prove(&TransitionStatement {
            prior_root,
            new_root,
            version,
        })?;

        metrics::counter!("punchclock_transitions_total", 1, "kind" => kind);
        metrics::histogram!("punchclock_commit_duration_seconds", start.elapsed().as_secs_f64());
        metrics::gauge!("punchclock_ledger_version", version.0 as f64);
        tracing::info!(kind, sequence = event.sequence, root = %new_root, "Command committed");

        let (leaf, record) = match transition {
            Transition::Leaf { leaf, record, .. } => (Some(leaf), Some(record)),
            Transition::ServerKey { .. } => (None, None),
        };

        Ok(CommitReceipt {
            kind: kind.to_string(),
            sequence: event.sequence,
            prior_root,
            new_root,
            version,
            receipt,
            leaf,
            record,
        })
    }

    // --- Read APIs ---

    pub fn current_root(&self) -> Digest {
        self.ledger.current_root()
    }

    pub fn version(&self) -> Version {
        self.ledger.version()
    }

    pub fn server_key(&self) -> PublicKey {
        self.ledger.server_key()
    }

    pub fn oracle_key(&self) -> PublicKey {
        self.ledger.oracle_key()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn record(&self, leaf: LeafIndex) -> Result<Option<Worker>, EngineError> {
        Ok(self.mirror.record(leaf)?)
    }

    pub fn witness(&self, leaf: LeafIndex) -> Result<Witness, EngineError> {
        Ok(self.mirror.witness(leaf)?)
    }

    pub fn verify_oracle(&self, time: u64, signature: &Signature) -> bool {
        auth::verify_oracle(time, signature, &self.ledger.oracle_key()).is_ok()
    }

    /// Receipt binding the full event log to the current root.
    pub fn proof(&self) -> LedgerProof {
        metrics::counter!("punchclock_proofs_generated_total", 1);
        LedgerProof::with_log_hash(
            Digest::from(self.log_hasher.finalize()),
            self.ledger.current_root(),
            self.event_count,
            self.ledger.version(),
        )
    }
}
