// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic Replay Logic.
//!
//! The event log is the source of truth. Replaying it from genesis
//! re-runs every check (signatures, witnesses, clock) and must land on the
//! same root after every event, with the mirror in sync the whole way.

use crate::config::{PROTOCOL_VERSION, TREE_HEIGHT};
use crate::error::{LedgerError, LedgerResult};
use crate::event::LedgerEvent;
use crate::mirror::{check_sync, MemoryRecordStore, Mirror};
use crate::state::ledger::LedgerState;
use crate::types::PublicKey;

/// Event log header (16 bytes)
/// [Magic: 4][Version: u32][TreeHeight: u32][Reserved: u32]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogHeader {
    pub version: u32,
    pub tree_height: u32,
}

impl LogHeader {
    pub const SIZE: usize = 16;
    pub const MAGIC: [u8; 4] = *b"PNCH";

    pub fn current() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            tree_height: TREE_HEIGHT as u32,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&Self::MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.tree_height.to_le_bytes());
        bytes
    }

    /// Parses and validates a header, returning the remaining bytes.
    pub fn read(buf: &[u8]) -> LedgerResult<(Self, &[u8])> {
        if buf.len() < Self::SIZE {
            return Err(LedgerError::Log("truncated header".to_string()));
        }
        if buf[0..4] != Self::MAGIC {
            return Err(LedgerError::Log("bad magic".to_string()));
        }

        let header = Self {
            version: read_u32(&buf[4..8]),
            tree_height: read_u32(&buf[8..12]),
        };
        if header != Self::current() {
            return Err(LedgerError::Log(format!(
                "unsupported log: version {}, tree height {}",
                header.version, header.tree_height
            )));
        }
        Ok((header, &buf[Self::SIZE..]))
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word)
}

/// Decodes a whole log file. Any damage fails closed.
pub fn decode_log(bytes: &[u8]) -> LedgerResult<Vec<LedgerEvent>> {
    let (_, mut rest) = LogHeader::read(bytes)?;
    let mut events = Vec::new();
    let mut offset = LogHeader::SIZE;

    while !rest.is_empty() {
        if rest.len() < 8 {
            return Err(LedgerError::Log(format!("truncated frame at offset {offset}")));
        }
        let len = read_u32(&rest[0..4]) as usize;
        let crc = read_u32(&rest[4..8]);
        let payload = rest
            .get(8..8 + len)
            .ok_or_else(|| LedgerError::Log(format!("truncated frame at offset {offset}")))?;
        if crc32fast::hash(payload) != crc {
            return Err(LedgerError::Log(format!("checksum mismatch at offset {offset}")));
        }

        let (event, _) = bincode::serde::decode_from_slice::<LedgerEvent, _>(payload, bincode::config::standard())
            .map_err(|e| LedgerError::Log(format!("undecodable event at offset {offset}: {e}")))?;
        if event.sequence != events.len() as u64 {
            return Err(LedgerError::Log(format!(
                "out of order event {} at offset {offset}",
                event.sequence
            )));
        }
        events.push(event);

        rest = &rest[8 + len..];
        offset += 8 + len;
    }

    Ok(events)
}

/// Re-applies `events` from genesis and returns the rebuilt ledger and mirror.
pub fn replay(oracle_key: PublicKey, events: &[LedgerEvent]) -> LedgerResult<(LedgerState, Mirror<MemoryRecordStore>)> {
    let mut ledger = LedgerState::genesis(oracle_key);
    let mut mirror = Mirror::new(MemoryRecordStore::new())?;

    for event in events {
        let diverged = LedgerError::ReplayDiverged { sequence: event.sequence };
        let transition = ledger.apply(&event.command).map_err(|_| diverged.clone())?;
        if ledger.current_root() != event.root_after {
            return Err(diverged);
        }
        mirror.apply(&transition)?;
        check_sync(&ledger, &mirror)?;
    }

    Ok((ledger, mirror))
}

/// Decode and replay a raw log in one go.
pub fn replay_log(oracle_key: PublicKey, bytes: &[u8]) -> LedgerResult<(LedgerState, Mirror<MemoryRecordStore>, u64)> {
    let events = decode_log(bytes)?;
    let (ledger, mirror) = replay(oracle_key, &events)?;
    Ok((ledger, mirror, events.len() as u64))
}
