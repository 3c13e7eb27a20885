// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants.

/// Height of the worker tree. Fixed for the lifetime of a ledger.
pub const TREE_HEIGHT: usize = 10;

/// Number of leaves (worker slots) in the tree (1 << TREE_HEIGHT).
pub const LEAF_CAPACITY: u32 = 1 << TREE_HEIGHT;

/// Protocol version stamped into log headers and proofs.
pub const PROTOCOL_VERSION: u32 = 1;

/// Leading field of every allocation message ("ALLOC\0\0\0" little-endian).
pub const ALLOCATION_TAG: u64 = u64::from_le_bytes(*b"ALLOC\0\0\0");

