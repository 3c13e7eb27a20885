// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-Only Event Log Writer
//!
//! - Events are written to disk BEFORE the ledger commits them
//! - Every append is fsync'd
//! - Only whole frames survive: a failed append is cut back off the file
//!
//! # File Format
//! ```text
//! [Header: 16 bytes][Frame][Frame][Frame]...
//! Frame = [len: u32][crc32: u32][bincode(LedgerEvent)]
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use punchclock_kernel::error::LedgerError;
use punchclock_kernel::event::LedgerEvent;
use punchclock_kernel::replay::{decode_log, LogHeader};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt event log: {0}")]
    Corrupt(LedgerError),

    #[error("Event {got} appended out of order, expected {expected}")]
    OutOfOrder { expected: u64, got: u64 },

    #[error("Event log unusable: a failed append could not be rolled back")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, EventLogError>;

pub struct EventLogWriter {
    path: PathBuf,
    file: File,
    event_count: u64,
    /// Bytes of whole frames (plus header) known to be durable.
    len: u64,
    poisoned: bool,
}

impl EventLogWriter {
    /// Open or create an event log file.
    ///
    /// An existing log is decoded in full first; a log that does not decode
    /// is never appended to.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let existing = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let event_count = if existing.is_empty() {
            0
        } else {
            decode_log(&existing).map_err(EventLogError::Corrupt)?.len() as u64
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        let len = if existing.is_empty() {
            file.set_len(0)?;
            file.write_all(&LogHeader::current().to_bytes())?;
            file.sync_all()?;
            LogHeader::SIZE as u64
        } else {
            existing.len() as u64
        };

        Ok(Self {
            path,
            file,
            event_count,
            len,
            poisoned: false,
        })
    }

    /// Frames and appends `event`. Returns the frame bytes written.
    ///
    /// Only returns Ok after the frame is durable. On error the file is
    /// truncated back to its last whole frame.
    pub fn append(&mut self, event: &LedgerEvent) -> Result<Vec<u8>> {
        self.append_with(event, |file, frame| {
            file.write_all(frame)?;
            file.sync_all()
        })
    }

    fn append_with(
        &mut self,
        event: &LedgerEvent,
        write: impl FnOnce(&mut File, &[u8]) -> std::io::Result<()>,
    ) -> Result<Vec<u8>> {
        if self.poisoned {
            return Err(EventLogError::Poisoned);
        }
        if event.sequence != self.event_count {
            return Err(EventLogError::OutOfOrder {
                expected: self.event_count,
                got: event.sequence,
            });
        }
        let frame = event.encode_frame().map_err(EventLogError::Corrupt)?;

        if let Err(e) = write(&mut self.file, &frame) {
            self.rollback();
            return Err(e.into());
        }

        self.len += frame.len() as u64;
        self.event_count += 1;
        Ok(frame)
    }

    /// Cuts off whatever a failed append left behind.
    fn rollback(&mut self) {
        let restored = self.file.set_len(self.len).and_then(|_| self.file.sync_all());
        match restored {
            Ok(()) => tracing::warn!(len = self.len, "Rolled back failed event log append"),
            Err(e) => {
                tracing::error!("Event log rollback failed, refusing further appends: {}", e);
                self.poisoned = true;
            }
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
