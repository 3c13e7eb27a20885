// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event-Sourced Persistence Layer
//!
//! The event log is the only durable state of a node. Every accepted
//! command is framed, appended and fsync'd before the in-memory ledger
//! commits it; startup rebuilds ledger and mirror by replaying the log.
//!
//! # Guarantees
//! - An event on disk is always a command that passed every check
//! - Recovery re-verifies every signature and witness
//! - Damaged logs fail closed

pub mod event_log;
pub mod event_replay;

pub use event_log::EventLogWriter;
pub use event_replay::{recover_from_event_log, Recovered};
