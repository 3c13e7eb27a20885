// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger Command definitions.

use serde::{Deserialize, Serialize};

use crate::merkle::Witness;
use crate::types::{LeafIndex, PublicKey, Signature, WorkStatus, Worker};

/// The three mutation entry points of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    InitServerKey {
        server_key: PublicKey,
    },
    AddWorker {
        worker_key: PublicKey,
        leaf: LeafIndex,
        witness: Witness,
        worker_signature: Signature,
        server_signature: Signature,
    },
    PunchIn {
        // Disclosed fields of the current record.
        worker_key: PublicKey,
        worked_hours: u64,
        // Withheld fields of the current record.
        status: WorkStatus,
        last_seen: u64,

        new_time: u64,
        oracle_signature: Signature,
        worker_signature: Signature,
        server_signature: Signature,
        leaf: LeafIndex,
        witness: Witness,
    },
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::InitServerKey { .. } => "init_server_key",
            Command::AddWorker { .. } => "add_worker",
            Command::PunchIn { .. } => "punch_in",
        }
    }

    /// The record a punch claims is currently committed at its leaf.
    pub fn claimed_record(&self) -> Option<Worker> {
        match self {
            Command::PunchIn {
                worker_key,
                worked_hours,
                status,
                last_seen,
                ..
            } => Some(Worker {
                worker_public_key: *worker_key,
                worked_hours: *worked_hours,
                currently_working: *status,
                last_seen: *last_seen,
            }),
            _ => None,
        }
    }
}
