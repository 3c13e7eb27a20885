// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::auth::{sign_message, Message};
use crate::error::LedgerError;
use crate::hash::{bytes_hash, empty_root};
use crate::state::command::Command;
use crate::tests::fixtures::{key, public, Harness, T1, T2, T3};
use crate::types::{LeafIndex, PublicKey, Version, WorkStatus};

#[test]
fn test_genesis_state() {
    let h = Harness::uninitialized();
    assert_eq!(h.ledger.current_root(), empty_root());
    assert!(h.ledger.server_key().is_unset());
    assert_eq!(h.ledger.oracle_key(), public(&h.oracle));
    assert_eq!(h.ledger.version(), Version(0));
}

#[test]
fn test_server_key_init_is_one_shot() {
    let mut h = Harness::uninitialized();
    let first = public(&key(10));
    let second = public(&key(11));

    h.ledger.init_server_key(first).unwrap();
    assert_eq!(h.ledger.init_server_key(second), Err(LedgerError::AlreadyInitialized));
    assert_eq!(h.ledger.server_key(), first);
    assert_eq!(h.ledger.current_root(), empty_root());
}

#[test]
fn test_server_key_cannot_be_set_to_sentinel() {
    let mut h = Harness::uninitialized();
    assert_eq!(h.ledger.init_server_key(PublicKey::UNSET), Err(LedgerError::InvalidPublicKey));
    assert!(h.ledger.server_key().is_unset());
}

#[test]
fn test_add_worker() {
    let mut h = Harness::new();
    let worker = key(1);
    h.add_worker(&worker, 3).unwrap();

    let record = h.record(3);
    assert_eq!(record.worker_public_key, public(&worker));
    assert_eq!(record.worked_hours, 0);
    assert_eq!(record.currently_working, WorkStatus::ClockedOut);
    assert_eq!(record.last_seen, 0);
    assert_ne!(h.ledger.current_root(), empty_root());
}

#[test]
fn test_add_worker_requires_server_key() {
    let mut h = Harness::uninitialized();
    assert_eq!(h.add_worker(&key(1), 0), Err(LedgerError::UnauthorizedServer));
    assert_eq!(h.ledger.current_root(), empty_root());
}

#[test]
fn test_no_double_allocation() {
    let mut h = Harness::new();
    h.add_worker(&key(1), 7).unwrap();
    let root_after_first = h.ledger.current_root();

    // Fresh witness for the now occupied leaf: claiming it is empty fails.
    assert_eq!(h.add_worker(&key(2), 7), Err(LedgerError::InvalidWitness));
    assert_eq!(h.ledger.current_root(), root_after_first);

    // Same worker again on the same leaf fails the same way.
    assert_eq!(h.add_worker(&key(1), 7), Err(LedgerError::InvalidWitness));
    assert_eq!(h.ledger.current_root(), root_after_first);
}

#[test]
fn test_reused_genesis_witness_on_occupied_leaf_is_stale() {
    let mut h = Harness::new();
    let second = h.add_worker_cmd(&key(2), 7);
    h.add_worker(&key(1), 7).unwrap();
    let root = h.ledger.current_root();
    let root_after_first = root;

    // The old witness honestly proves an empty leaf 7 at genesis.
    assert_eq!(h.submit(&second), Err(LedgerError::StaleRoot));
    assert_eq!(h.ledger.current_root(), root);
    assert_eq!(h.ledger.current_root(), root_after_first);
}

#[test]
fn test_add_worker_signature_gating() {
    let mut h = Harness::new();
    let worker = key(1);
    let impostor = key(2);

    // Worker signature from a different key.
    let mut cmd = h.add_worker_cmd(&worker, 0);
    if let Command::AddWorker { worker_signature, leaf, worker_key, .. } = &mut cmd {
        *worker_signature = sign_message(&impostor, &Message::allocation(*leaf, worker_key));
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::UnauthorizedWorker));

    // Server signature from a key that is not the stored server key.
    let mut cmd = h.add_worker_cmd(&worker, 0);
    if let Command::AddWorker { server_signature, leaf, worker_key, .. } = &mut cmd {
        *server_signature = sign_message(&impostor, &Message::allocation(*leaf, worker_key));
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::UnauthorizedServer));

    // Signatures for another leaf cannot be replayed here.
    let mut cmd = h.add_worker_cmd(&worker, 0);
    if let Command::AddWorker { leaf, .. } = &mut cmd {
        *leaf = LeafIndex(1);
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::UnauthorizedWorker));

    assert_eq!(h.ledger.current_root(), empty_root());
    assert_eq!(h.ledger.version(), Version(1));
}

#[test]
fn test_add_worker_out_of_range() {
    let mut h = Harness::new();
    let mut cmd = h.add_worker_cmd(&key(1), 0);
    if let Command::AddWorker { leaf, .. } = &mut cmd {
        *leaf = LeafIndex(1024);
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::LeafOutOfRange(1024)));
}

#[test]
fn test_punch_alternation_through_ledger() {
    let mut h = Harness::new();
    let worker = key(1);
    h.add_worker(&worker, 0).unwrap();

    let r1 = h.punch(&worker, 0, T1).unwrap();
    assert_eq!((r1.currently_working, r1.last_seen, r1.worked_hours), (WorkStatus::ClockedIn, T1, 0));

    let r2 = h.punch(&worker, 0, T2).unwrap();
    assert_eq!((r2.currently_working, r2.last_seen, r2.worked_hours), (WorkStatus::ClockedOut, T2, T2 - T1));

    let r3 = h.punch(&worker, 0, T3).unwrap();
    assert_eq!((r3.currently_working, r3.last_seen, r3.worked_hours), (WorkStatus::ClockedIn, T3, T2 - T1));
}

#[test]
fn test_punch_signature_gating() {
    let mut h = Harness::new();
    let worker = key(1);
    let other = key(2);
    h.add_worker(&worker, 0).unwrap();
    h.add_worker(&other, 1).unwrap();
    let root = h.ledger.current_root();

    // Worker cannot sign for another.
    let mut cmd = h.punch_cmd(&worker, 0, T1);
    if let Command::PunchIn { worker_signature, .. } = &mut cmd {
        *worker_signature = sign_message(&other, &Message::timestamp(T1));
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::UnauthorizedWorker));

    // Spoofed server.
    let mut cmd = h.punch_cmd(&worker, 0, T1);
    if let Command::PunchIn { server_signature, .. } = &mut cmd {
        *server_signature = sign_message(&other, &Message::timestamp(T1));
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::UnauthorizedServer));

    // Oracle signed a different time.
    let mut cmd = h.punch_cmd(&worker, 0, T1);
    if let Command::PunchIn { oracle_signature, .. } = &mut cmd {
        *oracle_signature = sign_message(&h.oracle, &Message::timestamp(T1 - 1));
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::UnauthorizedOracle));

    // Worker pointing at someone else's leaf with their own key.
    let cmd = h.punch_cmd(&worker, 1, T1);
    assert_eq!(h.submit(&cmd), Err(LedgerError::InvalidWitness));

    assert_eq!(h.ledger.current_root(), root);
}

#[test]
fn test_punch_cheating_on_prior_state() {
    let mut h = Harness::new();
    let worker = key(1);
    h.add_worker(&worker, 0).unwrap();
    h.punch(&worker, 0, T1).unwrap();
    let root = h.ledger.current_root();

    // Previous time.
    let mut cmd = h.punch_cmd(&worker, 0, T2);
    if let Command::PunchIn { last_seen, .. } = &mut cmd {
        *last_seen = T1 - 3_600_000;
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::InvalidWitness));

    // Worked hours.
    let mut cmd = h.punch_cmd(&worker, 0, T2);
    if let Command::PunchIn { worked_hours, .. } = &mut cmd {
        *worked_hours = 1_000_000;
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::InvalidWitness));

    // Status.
    let mut cmd = h.punch_cmd(&worker, 0, T2);
    if let Command::PunchIn { status, .. } = &mut cmd {
        *status = WorkStatus::ClockedOut;
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::InvalidWitness));

    assert_eq!(h.ledger.current_root(), root);
}

#[test]
fn test_punch_rejects_old_oracle_time() {
    let mut h = Harness::new();
    let worker = key(1);
    h.add_worker(&worker, 0).unwrap();
    h.punch(&worker, 0, T2).unwrap();
    let root = h.ledger.current_root();

    assert_eq!(
        h.punch(&worker, 0, T1),
        Err(LedgerError::NonMonotonicTime { last_seen: T2, new_time: T1 })
    );
    // Replaying the attestation that was just used.
    assert_eq!(
        h.punch(&worker, 0, T2),
        Err(LedgerError::NonMonotonicTime { last_seen: T2, new_time: T2 })
    );
    assert_eq!(h.ledger.current_root(), root);
}

#[test]
fn test_stale_witness_then_retry() {
    let mut h = Harness::new();
    let a = key(1);
    let b = key(2);

    // Both requests are built against the genesis root.
    let cmd_a = h.add_worker_cmd(&a, 0);
    let cmd_b = h.add_worker_cmd(&b, 1);

    h.submit(&cmd_a).unwrap();
    assert_eq!(h.submit(&cmd_b), Err(LedgerError::StaleRoot));

    // Resubmitted with a fresh witness.
    h.add_worker(&b, 1).unwrap();
    assert_eq!(h.record(1).worker_public_key, public(&b));
}

#[test]
fn test_prepared_transition_cannot_commit_twice() {
    let mut h = Harness::new();
    let cmd = h.add_worker_cmd(&key(1), 0);
    let transition = h.ledger.prepare(&cmd).unwrap();
    h.ledger.commit(&transition).unwrap();
    let root = h.ledger.current_root();

    assert_eq!(h.ledger.commit(&transition), Err(LedgerError::StaleRoot));
    assert_eq!(h.ledger.current_root(), root);
}

#[test]
fn test_compare_and_commit() {
    let mut h = Harness::new();
    let genesis = h.ledger.current_root();
    let next = bytes_hash(b"next");

    assert_eq!(h.ledger.compare_and_commit(next, next), Err(LedgerError::StaleRoot));
    h.ledger.compare_and_commit(genesis, next).unwrap();
    assert_eq!(h.ledger.current_root(), next);
    assert_eq!(h.ledger.version(), Version(2));
}

#[test]
fn test_witness_survives_changes_to_its_own_leaf() {
    let mut h = Harness::new();
    let worker = key(1);
    let early_witness = h.mirror.witness(LeafIndex(0)).unwrap();
    h.add_worker(&worker, 0).unwrap();

    // Only leaf 0 changed, so the siblings are still current.
    let mut cmd = h.punch_cmd(&worker, 0, T1);
    if let Command::PunchIn { witness, .. } = &mut cmd {
        assert_ne!(witness.anchor, early_witness.anchor);
        *witness = early_witness;
    }
    h.submit(&cmd).unwrap();
    assert_eq!(h.record(0).currently_working, WorkStatus::ClockedIn);
}

#[test]
fn test_forged_anchor_does_not_turn_cheating_into_stale() {
    let mut h = Harness::new();
    let worker = key(1);
    h.add_worker(&worker, 0).unwrap();
    h.punch(&worker, 0, T1).unwrap();
    let root = h.ledger.current_root();

    let mut cmd = h.punch_cmd(&worker, 0, T2);
    if let Command::PunchIn { worked_hours, witness, .. } = &mut cmd {
        *worked_hours = 1_000_000;
        witness.anchor = bytes_hash(b"anything");
    }
    assert_eq!(h.submit(&cmd), Err(LedgerError::InvalidWitness));

    // A real earlier root as anchor does not help either.
    let mut cmd = h.punch_cmd(&worker, 0, T2);
    if let Command::PunchIn { worked_hours, witness, .. } = &mut cmd {
        *worked_hours = 1_000_000;
        witness.anchor = empty_root();
    }
    assert!(h.ledger.was_committed(&empty_root()));
    assert_eq!(h.submit(&cmd), Err(LedgerError::InvalidWitness));
    assert_eq!(h.ledger.current_root(), root);
}

#[test]
fn test_committed_roots_are_remembered() {
    let mut h = Harness::new();
    assert!(h.ledger.was_committed(&empty_root()));
    h.add_worker(&key(1), 0).unwrap();
    let first = h.ledger.current_root();
    h.punch(&key(1), 0, T1).unwrap();

    assert!(h.ledger.was_committed(&first));
    assert!(h.ledger.was_committed(&h.ledger.current_root()));
    assert!(!h.ledger.was_committed(&bytes_hash(b"never")));
}
