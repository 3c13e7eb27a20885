// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The per-worker record committed in each leaf.

use serde::{Deserialize, Serialize};

use super::bytes::PublicKey;

/// Size of the canonical record encoding in bytes.
pub const RECORD_ENCODED_LEN: usize = 32 + 8 + 8 + 8;

/// Clock flag. Encoded as `0` / `1` everywhere, including JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum WorkStatus {
    #[default]
    ClockedOut = 0,
    ClockedIn = 1,
}

impl WorkStatus {
    pub fn toggled(self) -> Self {
        match self {
            WorkStatus::ClockedOut => WorkStatus::ClockedIn,
            WorkStatus::ClockedIn => WorkStatus::ClockedOut,
        }
    }
}

impl From<WorkStatus> for u8 {
    fn from(status: WorkStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for WorkStatus {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(WorkStatus::ClockedOut),
            1 => Ok(WorkStatus::ClockedIn),
            other => Err(format!("invalid work status {other}, expected 0 or 1")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Worker {
    pub worker_public_key: PublicKey,
    /// Accumulated time on the clock, in milliseconds.
    pub worked_hours: u64,
    pub currently_working: WorkStatus,
    /// Oracle time (ms since epoch) of the last accepted punch.
    pub last_seen: u64,
}

impl Worker {
    /// A freshly allocated record: everything zero except the key.
    pub fn new(worker_public_key: PublicKey) -> Self {
        Self {
            worker_public_key,
            worked_hours: 0,
            currently_working: WorkStatus::ClockedOut,
            last_seen: 0,
        }
    }

    /// The all-zero record. Its hash is the canonical empty leaf.
    pub fn zero() -> Self {
        Self::new(PublicKey::UNSET)
    }

    pub fn is_working(&self) -> bool {
        self.currently_working == WorkStatus::ClockedIn
    }

    /// Canonical encoding:
    /// `[key (32)][worked_hours u64 LE][currently_working u64 LE][last_seen u64 LE]`.
    ///
    /// Ledger and mirror both hash exactly these bytes.
    pub fn encode(&self) -> [u8; RECORD_ENCODED_LEN] {
        let mut out = [0u8; RECORD_ENCODED_LEN];
        out[0..32].copy_from_slice(self.worker_public_key.as_bytes());
        out[32..40].copy_from_slice(&self.worked_hours.to_le_bytes());
        out[40..48].copy_from_slice(&(self.currently_working as u64).to_le_bytes());
        out[48..56].copy_from_slice(&self.last_seen.to_le_bytes());
        out
    }
}
