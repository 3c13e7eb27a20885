// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Off-chain mirror of the committed tree.
//!
//! The operator keeps every record in a [`RecordStore`] plus a full tree of
//! their leaf hashes, so it can hand out fresh witnesses. The mirror must see
//! exactly the committed transitions, in order; anything else and the next
//! witness fails verification.

use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::hash::leaf_hash;
use crate::merkle::{MerkleTree, Witness};
use crate::state::ledger::{LedgerState, Transition};
use crate::types::{Digest, LeafIndex, Worker};

/// Read/write contract of whatever backs the mirror.
pub trait RecordStore {
    fn get(&self, leaf: LeafIndex) -> Option<Worker>;
    fn put(&mut self, leaf: LeafIndex, record: Worker);
    fn len(&self) -> usize;
    /// All stored records in ascending leaf order.
    fn records(&self) -> Vec<(LeafIndex, Worker)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: BTreeMap<LeafIndex, Worker>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, leaf: LeafIndex) -> Option<Worker> {
        self.records.get(&leaf).copied()
    }

    fn put(&mut self, leaf: LeafIndex, record: Worker) {
        self.records.insert(leaf, record);
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn records(&self) -> Vec<(LeafIndex, Worker)> {
        self.records.iter().map(|(leaf, record)| (*leaf, *record)).collect()
    }
}

pub struct Mirror<S: RecordStore> {
    store: S,
    tree: MerkleTree,
}

impl<S: RecordStore> Mirror<S> {
    /// Builds the tree from whatever the store already holds.
    pub fn new(store: S) -> LedgerResult<Self> {
        let mut tree = MerkleTree::new();
        for (leaf, record) in store.records() {
            tree.set_leaf(leaf, leaf_hash(&record))?;
        }
        Ok(Self { store, tree })
    }

    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    pub fn record(&self, leaf: LeafIndex) -> LedgerResult<Option<Worker>> {
        let leaf = leaf.checked()?;
        Ok(self.store.get(leaf))
    }

    pub fn witness(&self, leaf: LeafIndex) -> LedgerResult<Witness> {
        self.tree.witness(leaf)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mirrors a transition that the ledger has already committed.
    pub fn apply(&mut self, transition: &Transition) -> LedgerResult<()> {
        if let Transition::Leaf { leaf, record, .. } = transition {
            self.tree.set_leaf(*leaf, leaf_hash(record))?;
            self.store.put(*leaf, *record);
        }
        Ok(())
    }
}

/// The sync invariant: mirror root equals committed root.
pub fn check_sync<S: RecordStore>(ledger: &LedgerState, mirror: &Mirror<S>) -> LedgerResult<()> {
    if mirror.root() == ledger.current_root() {
        Ok(())
    } else {
        Err(LedgerError::MirrorDiverged)
    }
}
