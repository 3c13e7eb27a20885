// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proof Structures.
//!
//! [`LedgerProof`] is the audit receipt for a whole event log.
//! [`ProofBackend`] is the seam where a succinct proof system would wrap
//! individual transitions; [`HashReceiptBackend`] is the plain-server
//! stand-in that only commits to the statement.

use serde::{Deserialize, Serialize};

use crate::config::PROTOCOL_VERSION;
use crate::error::LedgerResult;
use crate::hash::{bytes_hash, empty_root};
use crate::types::{Digest, Version};

/// A receipt that a specific event log, replayed from genesis, ends at a
/// specific committed root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerProof {
    pub protocol_version: u32,
    /// Root of the empty tree the log starts from.
    pub genesis_root: Digest,
    /// BLAKE3 of the raw log file (header + frames).
    pub event_log_hash: Digest,
    pub final_root: Digest,
    pub event_count: u64,
    pub version: Version,
}

impl LedgerProof {
    pub fn new(event_log_bytes: &[u8], final_root: Digest, event_count: u64, version: Version) -> Self {
        Self::with_log_hash(bytes_hash(event_log_bytes), final_root, event_count, version)
    }

    /// For callers that hash the log incrementally while appending.
    pub fn with_log_hash(event_log_hash: Digest, final_root: Digest, event_count: u64, version: Version) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            genesis_root: empty_root(),
            event_log_hash,
            final_root,
            event_count,
            version,
        }
    }

    /// Two nodes agree iff they saw the same log and reached the same root.
    pub fn matches(&self, other: &LedgerProof) -> bool {
        self.event_log_hash == other.event_log_hash
            && self.final_root == other.final_root
            && self.event_count == other.event_count
    }
}

/// Public inputs of one committed transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionStatement {
    pub prior_root: Digest,
    pub new_root: Digest,
    pub version: Version,
}

impl TransitionStatement {
    pub fn encode(&self) -> [u8; 72] {
        let mut out = [0u8; 72];
        out[0..32].copy_from_slice(self.prior_root.as_bytes());
        out[32..64].copy_from_slice(self.new_root.as_bytes());
        out[64..72].copy_from_slice(&self.version.0.to_le_bytes());
        out
    }
}

pub trait ProofBackend {
    type Receipt;

    fn prove(&self, statement: &TransitionStatement) -> LedgerResult<Self::Receipt>;

    fn verify(&self, statement: &TransitionStatement, receipt: &Self::Receipt) -> bool;
}

/// Commits to the statement with BLAKE3. Not zero-knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashReceiptBackend;

impl ProofBackend for HashReceiptBackend {
    type Receipt = Digest;

    fn prove(&self, statement: &TransitionStatement) -> LedgerResult<Digest> {
        Ok(bytes_hash(&statement.encode()))
    }

    fn verify(&self, statement: &TransitionStatement, receipt: &Digest) -> bool {
        bytes_hash(&statement.encode()) == *receipt
    }
}
