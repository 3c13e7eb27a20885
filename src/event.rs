// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger events: the durable record of accepted commands.
//!
//! # Invariants
//! - Only commands that committed are ever turned into events
//! - `sequence` starts at 0 and increases by one per event
//! - `root_after` is the committed root right after the command applied
//! - Replaying the commands from genesis reproduces every `root_after`

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::state::command::Command;
use crate::types::Digest;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub sequence: u64,
    pub command: Command,
    pub root_after: Digest,
}

impl LedgerEvent {
    /// `[len: u32 LE][crc32: u32 LE][bincode payload]`
    pub fn encode_frame(&self) -> LedgerResult<Vec<u8>> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| LedgerError::Log(e.to_string()))?;
        let len = u32::try_from(payload.len())
            .map_err(|_| LedgerError::Log("event too large".to_string()))?;

        let mut frame = Vec::with_capacity(8 + payload.len());
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }
}
