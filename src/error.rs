// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The server key was already claimed.
    #[error("server key already initialized")]
    AlreadyInitialized,
    #[error("worker signature rejected")]
    UnauthorizedWorker,
    #[error("server signature rejected")]
    UnauthorizedServer,
    #[error("oracle signature rejected")]
    UnauthorizedOracle,
    /// Claimed leaf content does not match the committed root.
    #[error("witness does not prove the claimed leaf against the committed root")]
    InvalidWitness,
    /// Witness was built against a root that has since been replaced.
    #[error("witness was built against a stale root")]
    StaleRoot,
    #[error("oracle time {new_time} is not after last seen time {last_seen}")]
    NonMonotonicTime { last_seen: u64, new_time: u64 },
    #[error("worked duration overflow")]
    DurationOverflow,
    #[error("leaf index {0} out of range")]
    LeafOutOfRange(u32),
    #[error("invalid public key")]
    InvalidPublicKey,
    /// Off-chain mirror no longer matches the committed root.
    #[error("mirror root diverged from committed root")]
    MirrorDiverged,
    #[error("replay diverged at event {sequence}")]
    ReplayDiverged { sequence: u64 },
    #[error("event log: {0}")]
    Log(String),
}

pub type LedgerResult<T> = core::result::Result<T, LedgerError>;
