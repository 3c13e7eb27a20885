// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use punchclock_kernel::merkle::Witness;
use punchclock_kernel::state::command::Command;
use punchclock_kernel::types::{Digest, LeafIndex, PublicKey, Signature, Version, WorkStatus, Worker};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitServerRequest {
    pub server_key: PublicKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWorkerRequest {
    pub worker_key: PublicKey,
    pub leaf: u32,
    pub witness: Witness,
    pub worker_signature: Signature,
    pub server_signature: Signature,
}

impl From<AddWorkerRequest> for Command {
    fn from(req: AddWorkerRequest) -> Self {
        Command::AddWorker {
            worker_key: req.worker_key,
            leaf: LeafIndex(req.leaf),
            witness: req.witness,
            worker_signature: req.worker_signature,
            server_signature: req.server_signature,
        }
    }
}

/// A punch carries the full current record: `worker_key` and
/// `worked_hours` as disclosed, `status` (0/1) and `last_seen` as withheld.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    pub worker_key: PublicKey,
    pub worked_hours: u64,
    pub status: WorkStatus,
    pub last_seen: u64,
    pub new_time: u64,
    pub oracle_signature: Signature,
    pub worker_signature: Signature,
    pub server_signature: Signature,
    pub leaf: u32,
    pub witness: Witness,
}

impl From<PunchRequest> for Command {
    fn from(req: PunchRequest) -> Self {
        Command::PunchIn {
            worker_key: req.worker_key,
            worked_hours: req.worked_hours,
            status: req.status,
            last_seen: req.last_seen,
            new_time: req.new_time,
            oracle_signature: req.oracle_signature,
            worker_signature: req.worker_signature,
            server_signature: req.server_signature,
            leaf: LeafIndex(req.leaf),
            witness: req.witness,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub leaf: u32,
    /// `None` for an unallocated slot.
    pub record: Option<Worker>,
    pub witness: Witness,
    pub root: Digest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub root: Digest,
    pub version: Version,
    pub server_key: Option<PublicKey>,
    pub oracle_key: PublicKey,
    pub event_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleVerifyRequest {
    pub time: u64,
    pub signature: Signature,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleVerifyResponse {
    pub valid: bool,
}
