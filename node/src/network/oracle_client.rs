// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Client for the external time oracle.
//!
//! The oracle answers `GET {base_url}` with
//! `{ "data": { "time": <ms> }, "signature": "<hex>", "publicKey": "<hex>" }`.
//! Attestations are checked against the configured oracle key before they
//! are handed out, so a caller never builds a punch on a bad time.

use std::time::Duration;

use punchclock_kernel::auth::verify_oracle;
use punchclock_kernel::error::LedgerError;
use punchclock_kernel::types::{PublicKey, Signature};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleData {
    pub time: u64,
}

/// Wire shape of the oracle's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleResponse {
    pub data: OracleData,
    pub signature: Signature,
    #[serde(rename = "publicKey")]
    pub public_key: PublicKey,
}

/// A verified signed timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleAttestation {
    pub time: u64,
    pub signature: Signature,
    pub public_key: PublicKey,
}

impl OracleResponse {
    pub fn verify(self, oracle_key: &PublicKey) -> Result<OracleAttestation, EngineError> {
        if self.public_key != *oracle_key {
            return Err(LedgerError::UnauthorizedOracle.into());
        }
        verify_oracle(self.data.time, &self.signature, oracle_key)?;
        Ok(OracleAttestation {
            time: self.data.time,
            signature: self.signature,
            public_key: self.public_key,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OracleClient {
    base_url: String,
    oracle_key: PublicKey,
    client: Client,
}

impl OracleClient {
    pub fn new(url: &str, oracle_key: PublicKey, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Config(format!("oracle client: {e}")))?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            oracle_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch(&self) -> Result<OracleAttestation, EngineError> {
        let resp = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Network(format!("Oracle request failed: {}", resp.status())));
        }

        let body: OracleResponse = resp.json().await.map_err(|e| EngineError::Network(e.to_string()))?;
        let attestation = body.verify(&self.oracle_key)?;
        tracing::debug!(time = attestation.time, "Fetched oracle attestation");
        Ok(attestation)
    }
}
