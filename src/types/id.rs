// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use serde::{Deserialize, Serialize};

use crate::config::LEAF_CAPACITY;
use crate::error::{LedgerError, LedgerResult};

/// Position of a worker slot in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct LeafIndex(pub u32);

impl LeafIndex {
    /// Returns the index if it addresses a slot of the fixed-height tree.
    pub fn checked(self) -> LedgerResult<Self> {
        if self.0 < LEAF_CAPACITY {
            Ok(self)
        } else {
            Err(LedgerError::LeafOutOfRange(self.0))
        }
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for LeafIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Count of successful commits since genesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Version(pub u64);

impl Version {
    pub fn next(&self) -> Self {
        Version(self.0 + 1)
    }
}
