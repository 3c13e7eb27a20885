// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Signature Authority
//!
//! Stateless Ed25519 verification for the three signing roles. Every
//! authorization decision in the ledger goes through [`authorize`].
//!
//! Messages are sequences of `u64` field elements, each encoded little-endian
//! and concatenated before signing. Verification is strict: small-order keys
//! (including the all-zero unset sentinel) never verify.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

use crate::config::ALLOCATION_TAG;
use crate::error::{LedgerError, LedgerResult};
use crate::types::{LeafIndex, PublicKey, Signature};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Worker,
    Server,
    Oracle,
}

impl Role {
    fn rejection(self) -> LedgerError {
        match self {
            Role::Worker => LedgerError::UnauthorizedWorker,
            Role::Server => LedgerError::UnauthorizedServer,
            Role::Oracle => LedgerError::UnauthorizedOracle,
        }
    }
}

/// A signed message: an ordered list of field elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message(Vec<u64>);

impl Message {
    pub fn new(fields: Vec<u64>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[u64] {
        &self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|field| field.to_le_bytes()).collect()
    }

    /// What worker and server both sign to allocate `leaf` to `worker_key`.
    ///
    /// `[ALLOCATION_TAG, leaf, key_0, key_1, key_2, key_3]`
    pub fn allocation(leaf: LeafIndex, worker_key: &PublicKey) -> Self {
        let mut fields = Vec::with_capacity(6);
        fields.push(ALLOCATION_TAG);
        fields.push(u64::from(leaf.0));
        fields.extend_from_slice(&worker_key.to_fields());
        Self(fields)
    }

    /// What worker, server and oracle each sign for a punch: `[time]`.
    pub fn timestamp(time: u64) -> Self {
        Self(vec![time])
    }
}

/// Pure signature check. Malformed keys simply fail.
pub fn verify(message: &Message, signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    key.verify_strict(&message.to_bytes(), &signature).is_ok()
}

/// Verifies `signature` for `role`, mapping failure to that role's error.
pub fn authorize(role: Role, message: &Message, signature: &Signature, public_key: &PublicKey) -> LedgerResult<()> {
    if verify(message, signature, public_key) {
        Ok(())
    } else {
        Err(role.rejection())
    }
}

/// Checks an oracle attestation without touching any state.
pub fn verify_oracle(time: u64, signature: &Signature, oracle_key: &PublicKey) -> LedgerResult<()> {
    authorize(Role::Oracle, &Message::timestamp(time), signature, oracle_key)
}

/// Rejects keys that can never produce a valid strict signature.
pub fn validate_public_key(key: &PublicKey) -> LedgerResult<()> {
    match VerifyingKey::from_bytes(key.as_bytes()) {
        Ok(vk) if !vk.is_weak() => Ok(()),
        _ => Err(LedgerError::InvalidPublicKey),
    }
}

/// Client-side helper: signs `message` with `signing_key`.
pub fn sign_message(signing_key: &SigningKey, message: &Message) -> Signature {
    Signature(signing_key.sign(&message.to_bytes()).to_bytes())
}

impl From<&VerifyingKey> for PublicKey {
    fn from(key: &VerifyingKey) -> Self {
        PublicKey(key.to_bytes())
    }
}

impl From<&SigningKey> for PublicKey {
    fn from(key: &SigningKey) -> Self {
        PublicKey(key.verifying_key().to_bytes())
    }
}
