// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-height binary Merkle tree and its witnesses.

pub mod tree;
pub mod witness;

pub use tree::MerkleTree;
pub use witness::{verify_witness, Witness};
