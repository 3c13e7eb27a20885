// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dense in-memory Merkle tree over leaf hashes.

use crate::config::{LEAF_CAPACITY, TREE_HEIGHT};
use crate::error::LedgerResult;
use crate::hash::{empty_subtrees, node_hash};
use crate::merkle::witness::Witness;
use crate::types::{Digest, LeafIndex};

/// `levels[0]` holds the leaves, `levels[TREE_HEIGHT]` the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// A tree with every leaf set to the canonical empty value.
    pub fn new() -> Self {
        let empty = empty_subtrees();
        let levels = (0..=TREE_HEIGHT)
            .map(|level| vec![empty[level]; (LEAF_CAPACITY as usize) >> level])
            .collect();
        Self { levels }
    }

    pub fn root(&self) -> Digest {
        self.levels[TREE_HEIGHT][0]
    }

    /// Writes a leaf and rehashes its path to the root.
    pub fn set_leaf(&mut self, index: LeafIndex, value: Digest) -> LedgerResult<()> {
        let index = index.checked()?;
        let mut pos = index.as_usize();
        self.levels[0][pos] = value;
        for level in 1..=TREE_HEIGHT {
            let parent = pos >> 1;
            let left = self.levels[level - 1][parent << 1];
            let right = self.levels[level - 1][(parent << 1) | 1];
            self.levels[level][parent] = node_hash(&left, &right);
            pos = parent;
        }
        Ok(())
    }

    pub fn witness(&self, index: LeafIndex) -> LedgerResult<Witness> {
        let index = index.checked()?;
        let mut siblings = [Digest([0u8; 32]); TREE_HEIGHT];
        let mut pos = index.as_usize();
        for (level, sibling) in siblings.iter_mut().enumerate() {
            *sibling = self.levels[level][pos ^ 1];
            pos >>= 1;
        }
        Ok(Witness::new(siblings, self.root()))
    }
}

impl Default for MerkleTree {
    fn default() -> Self {
        Self::new()
    }
}
