// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Clock state machine.
//!
//! ```text
//! Unallocated --add_worker--> ClockedOut(hours = 0) <--punch_in--> ClockedIn
//! ```

use crate::error::{LedgerError, LedgerResult};
use crate::types::Worker;

/// The single record transition.
///
/// From `ClockedOut` this is a punch-in: the flag flips and `last_seen` is
/// stamped, nothing accrues. From `ClockedIn` it is a punch-out:
/// `new_time - last_seen` is added to `worked_hours` and the flag flips back.
///
/// `new_time` must be strictly after `last_seen`, so a given attestation can
/// move a record at most once.
pub fn punch_in(record: &Worker, new_time: u64) -> LedgerResult<Worker> {
    if new_time <= record.last_seen {
        return Err(LedgerError::NonMonotonicTime {
            last_seen: record.last_seen,
            new_time,
        });
    }

    let worked_hours = if record.is_working() {
        record
            .worked_hours
            .checked_add(new_time - record.last_seen)
            .ok_or(LedgerError::DurationOverflow)?
    } else {
        record.worked_hours
    };

    Ok(Worker {
        worker_public_key: record.worker_public_key,
        worked_hours,
        currently_working: record.currently_working.toggled(),
        last_seen: new_time,
    })
}
