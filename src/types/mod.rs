// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Core ledger types.

mod bytes;

pub mod id;
pub mod worker;

pub use bytes::{Digest, PublicKey, Signature};
pub use id::{LeafIndex, Version};
pub use worker::{WorkStatus, Worker};
