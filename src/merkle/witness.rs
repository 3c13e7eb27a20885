// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Merkle witnesses.

use serde::{Deserialize, Serialize};

use crate::config::TREE_HEIGHT;
use crate::hash::node_hash;
use crate::types::{Digest, LeafIndex};

/// Sibling hashes from the leaf level up to (excluding) the root.
///
/// Path directions are not stored: bit `i` of the leaf index tells whether
/// the running node is a right child at level `i`.
///
/// `anchor` is the root of the tree the path was read from. It is not part
/// of the proof; the ledger only uses it to tell a stale witness from a
/// wrong one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub siblings: [Digest; TREE_HEIGHT],
    pub anchor: Digest,
}

impl Witness {
    pub fn new(siblings: [Digest; TREE_HEIGHT], anchor: Digest) -> Self {
        Self { siblings, anchor }
    }

    /// Recomputes the root reached from `leaf_value` at `index`.
    pub fn calculate_root(&self, index: LeafIndex, leaf_value: &Digest) -> Digest {
        let mut node = *leaf_value;
        for (level, sibling) in self.siblings.iter().enumerate() {
            node = if (index.0 >> level) & 1 == 1 {
                node_hash(sibling, &node)
            } else {
                node_hash(&node, sibling)
            };
        }
        node
    }
}

/// True iff `witness` proves `claimed_leaf` sits at `index` under `root`.
pub fn verify_witness(root: &Digest, index: LeafIndex, witness: &Witness, claimed_leaf: &Digest) -> bool {
    index.checked().is_ok() && witness.calculate_root(index, claimed_leaf) == *root
}
