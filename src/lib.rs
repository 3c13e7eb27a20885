// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! punchclock-kernel: an authenticated, Merkle-committed time-tracking ledger.

pub mod config;
pub mod error;
pub mod types;
pub mod hash;
pub mod merkle;
pub mod auth;
pub mod clock;
pub mod state;
pub mod mirror;
pub mod event;
pub mod replay;
pub mod proof;

#[cfg(test)]
pub mod tests;
