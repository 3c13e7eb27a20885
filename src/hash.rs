// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canonical BLAKE3 Hashing
//!
//! Every value that ends up in the committed root goes through this module.
//! The ledger and the off-chain mirror MUST share these functions or their
//! roots diverge permanently.
//!
//! # Hash Input Structure
//! ```text
//! leaf  = BLAKE3(0x00 || Worker::encode())
//! inner = BLAKE3(0x01 || left || right)
//! ```
//! The prefixes keep a 64-byte inner node from ever being confused with a
//! leaf encoding.

use std::sync::OnceLock;

use crate::config::TREE_HEIGHT;
use crate::types::{Digest, Worker};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Hash of a worker record as stored in a leaf.
pub fn leaf_hash(record: &Worker) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(&record.encode());
    hasher.finalize().into()
}

/// Hash of two sibling nodes.
pub fn node_hash(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[NODE_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hasher.finalize().into()
}

/// The canonical unassigned leaf: hash of the all-zero record.
pub fn empty_leaf() -> Digest {
    empty_subtrees()[0]
}

/// Root of a tree in which every leaf is empty.
pub fn empty_root() -> Digest {
    empty_subtrees()[TREE_HEIGHT]
}

/// `empty_subtrees()[level]` is the root of an all-empty subtree of that height.
pub fn empty_subtrees() -> &'static [Digest; TREE_HEIGHT + 1] {
    static EMPTY: OnceLock<[Digest; TREE_HEIGHT + 1]> = OnceLock::new();
    EMPTY.get_or_init(|| {
        let mut levels = [leaf_hash(&Worker::zero()); TREE_HEIGHT + 1];
        for level in 1..=TREE_HEIGHT {
            levels[level] = node_hash(&levels[level - 1], &levels[level - 1]);
        }
        levels
    })
}

/// BLAKE3 of raw bytes (event log files, receipts).
pub fn bytes_hash(bytes: &[u8]) -> Digest {
    blake3::hash(bytes).into()
}
