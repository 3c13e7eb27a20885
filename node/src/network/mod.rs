// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod oracle_client;

pub use oracle_client::{OracleAttestation, OracleClient};
