// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger State: the committed root and the protocol controller.
//!
//! Every mutation is split in two:
//! 1. `prepare` runs all checks (signatures, witness, clock) against `&self`
//!    and yields a [`Transition`]. Nothing is written.
//! 2. `commit` applies the transition with compare-and-commit semantics: the
//!    root is only replaced if it still equals the root the transition was
//!    built against.
//!
//! A failed operation therefore never leaves a partial effect.

use std::collections::HashSet;

use crate::auth::{authorize, validate_public_key, Message, Role};
use crate::clock;
use crate::error::{LedgerError, LedgerResult};
use crate::hash::{empty_leaf, empty_root, leaf_hash};
use crate::merkle::Witness;
use crate::state::command::Command;
use crate::types::{Digest, LeafIndex, PublicKey, Signature, Version, WorkStatus, Worker};

/// Outcome of a successful `prepare`, ready to be committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    ServerKey {
        key: PublicKey,
    },
    Leaf {
        leaf: LeafIndex,
        record: Worker,
        prior_root: Digest,
        new_root: Digest,
    },
}

impl Transition {
    /// Root after this transition, given the root it applies to.
    pub fn root_after(&self, current: Digest) -> Digest {
        match self {
            Transition::ServerKey { .. } => current,
            Transition::Leaf { new_root, .. } => *new_root,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LedgerState {
    root: Digest,
    server_key: PublicKey,
    oracle_key: PublicKey,
    version: Version,
    /// Every root this ledger has held, genesis included.
    committed_roots: HashSet<Digest>,
}

impl LedgerState {
    /// Empty tree, unset server key, oracle fixed for the ledger's lifetime.
    pub fn genesis(oracle_key: PublicKey) -> Self {
        Self {
            root: empty_root(),
            server_key: PublicKey::UNSET,
            oracle_key,
            version: Version(0),
            committed_roots: HashSet::from([empty_root()]),
        }
    }

    // --- Read APIs ---

    pub fn current_root(&self) -> Digest {
        self.root
    }

    pub fn server_key(&self) -> PublicKey {
        self.server_key
    }

    pub fn oracle_key(&self) -> PublicKey {
        self.oracle_key
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether `witness` proves `claimed_leaf` at `leaf` under the current root.
    pub fn verify_witness(&self, leaf: LeafIndex, witness: &Witness, claimed_leaf: &Digest) -> bool {
        crate::merkle::verify_witness(&self.root, leaf, witness, claimed_leaf)
    }

    // --- Validation ---

    pub fn prepare(&self, cmd: &Command) -> LedgerResult<Transition> {
        match cmd {
            Command::InitServerKey { server_key } => {
                if !self.server_key.is_unset() {
                    return Err(LedgerError::AlreadyInitialized);
                }
                validate_public_key(server_key)?;
                Ok(Transition::ServerKey { key: *server_key })
            }
            Command::AddWorker {
                worker_key,
                leaf,
                witness,
                worker_signature,
                server_signature,
            } => {
                let leaf = leaf.checked()?;
                let message = Message::allocation(leaf, worker_key);
                authorize(Role::Worker, &message, worker_signature, worker_key)?;
                authorize(Role::Server, &message, server_signature, &self.server_key)?;

                // Only an empty slot can be allocated.
                self.check_leaf(leaf, witness, &empty_leaf())?;

                let record = Worker::new(*worker_key);
                Ok(Transition::Leaf {
                    leaf,
                    record,
                    prior_root: self.root,
                    new_root: witness.calculate_root(leaf, &leaf_hash(&record)),
                })
            }
            Command::PunchIn {
                worker_key,
                new_time,
                oracle_signature,
                worker_signature,
                server_signature,
                leaf,
                witness,
                ..
            } => {
                let leaf = leaf.checked()?;
                let message = Message::timestamp(*new_time);
                authorize(Role::Worker, &message, worker_signature, worker_key)?;
                authorize(Role::Server, &message, server_signature, &self.server_key)?;
                authorize(Role::Oracle, &message, oracle_signature, &self.oracle_key)?;

                let current = cmd
                    .claimed_record()
                    .ok_or(LedgerError::InvalidWitness)?;
                self.check_leaf(leaf, witness, &leaf_hash(&current))?;

                let record = clock::punch_in(&current, *new_time)?;
                Ok(Transition::Leaf {
                    leaf,
                    record,
                    prior_root: self.root,
                    new_root: witness.calculate_root(leaf, &leaf_hash(&record)),
                })
            }
        }
    }

    /// Whether `root` was ever the committed root of this ledger.
    pub fn was_committed(&self, root: &Digest) -> bool {
        self.committed_roots.contains(root)
    }

    /// A failing witness is only `StaleRoot` if it still proves the claim
    /// against an earlier committed root. The anchor alone proves nothing.
    fn check_leaf(&self, leaf: LeafIndex, witness: &Witness, claimed: &Digest) -> LedgerResult<()> {
        let computed = witness.calculate_root(leaf, claimed);
        if computed == self.root {
            Ok(())
        } else if computed == witness.anchor && witness.anchor != self.root && self.was_committed(&witness.anchor) {
            Err(LedgerError::StaleRoot)
        } else {
            Err(LedgerError::InvalidWitness)
        }
    }

    // --- Write Logic ---

    /// The only way the root changes.
    pub fn compare_and_commit(&mut self, expected_prior: Digest, new_root: Digest) -> LedgerResult<()> {
        if self.root != expected_prior {
            return Err(LedgerError::StaleRoot);
        }
        self.root = new_root;
        self.committed_roots.insert(new_root);
        self.version = self.version.next();
        Ok(())
    }

    pub fn commit(&mut self, transition: &Transition) -> LedgerResult<()> {
        match transition {
            Transition::ServerKey { key } => {
                if !self.server_key.is_unset() {
                    return Err(LedgerError::AlreadyInitialized);
                }
                self.server_key = *key;
                self.version = self.version.next();
                Ok(())
            }
            Transition::Leaf { prior_root, new_root, .. } => self.compare_and_commit(*prior_root, *new_root),
        }
    }

    pub fn apply(&mut self, cmd: &Command) -> LedgerResult<Transition> {
        let transition = self.prepare(cmd)?;
        self.commit(&transition)?;
        Ok(transition)
    }

    // --- Method surface ---

    pub fn init_server_key(&mut self, server_key: PublicKey) -> LedgerResult<()> {
        self.apply(&Command::InitServerKey { server_key }).map(|_| ())
    }

    pub fn add_worker(
        &mut self,
        worker_key: PublicKey,
        leaf: LeafIndex,
        witness: Witness,
        worker_signature: Signature,
        server_signature: Signature,
    ) -> LedgerResult<Transition> {
        self.apply(&Command::AddWorker {
            worker_key,
            leaf,
            witness,
            worker_signature,
            server_signature,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn punch_in(
        &mut self,
        worker_key: PublicKey,
        worked_hours: u64,
        status: WorkStatus,
        last_seen: u64,
        new_time: u64,
        oracle_signature: Signature,
        worker_signature: Signature,
        server_signature: Signature,
        leaf: LeafIndex,
        witness: Witness,
    ) -> LedgerResult<Transition> {
        self.apply(&Command::PunchIn {
            worker_key,
            worked_hours,
            status,
            last_seen,
            new_time,
            oracle_signature,
            worker_signature,
            server_signature,
            leaf,
            witness,
        })
    }
}
