use ed25519_dalek::SigningKey;
use punchclock_kernel::auth::{sign_message, Message};
use punchclock_kernel::error::LedgerError;
use punchclock_kernel::replay::replay_log;
use punchclock_kernel::state::command::Command;
use punchclock_kernel::types::{LeafIndex, PublicKey, WorkStatus, Worker};
use punchclock_node::config::NodeConfig;
use punchclock_node::engine::Engine;
use punchclock_node::errors::EngineError;
use tempfile::tempdir;

const T1: u64 = 1727967420485;
const T2: u64 = 1728209845708;
const T3: u64 = 1728225355876;

fn key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

fn server() -> SigningKey {
    key(100)
}

fn oracle() -> SigningKey {
    key(200)
}

fn config(log: Option<std::path::PathBuf>) -> NodeConfig {
    NodeConfig {
        event_log_path: log,
        oracle_key: PublicKey::from(&oracle()),
        ..NodeConfig::default()
    }
}

fn add_worker_cmd(engine: &Engine, worker: &SigningKey, leaf: u32) -> Command {
    let leaf = LeafIndex(leaf);
    let worker_key = PublicKey::from(worker);
    let message = Message::allocation(leaf, &worker_key);
    Command::AddWorker {
        worker_key,
        leaf,
        witness: engine.witness(leaf).unwrap(),
        worker_signature: sign_message(worker, &message),
        server_signature: sign_message(&server(), &message),
    }
}

fn punch_cmd(engine: &Engine, worker: &SigningKey, leaf: u32, time: u64) -> Command {
    let leaf = LeafIndex(leaf);
    let current = engine.record(leaf).unwrap().unwrap_or_else(Worker::zero);
    let message = Message::timestamp(time);
    Command::PunchIn {
        worker_key: PublicKey::from(worker),
        worked_hours: current.worked_hours,
        status: current.currently_working,
        last_seen: current.last_seen,
        new_time: time,
        oracle_signature: sign_message(&oracle(), &message),
        worker_signature: sign_message(worker, &message),
        server_signature: sign_message(&server(), &message),
        leaf,
        witness: engine.witness(leaf).unwrap(),
    }
}

fn run_session(engine: &mut Engine) {
    engine
        .submit(Command::InitServerKey {
            server_key: PublicKey::from(&server()),
        })
        .unwrap();
    let (alice, bob) = (key(1), key(2));
    let cmd = add_worker_cmd(engine, &alice, 0);
    engine.submit(cmd).unwrap();
    let cmd = add_worker_cmd(engine, &bob, 77);
    engine.submit(cmd).unwrap();
    let cmd = punch_cmd(engine, &alice, 0, T1);
    engine.submit(cmd).unwrap();
    let cmd = punch_cmd(engine, &alice, 0, T3);
    engine.submit(cmd).unwrap();
    let cmd = punch_cmd(engine, &bob, 77, T2);
    engine.submit(cmd).unwrap();
}

#[test]
fn test_commit_receipts() {
    let mut engine = Engine::new(&config(None)).unwrap();
    let init = engine
        .submit(Command::InitServerKey {
            server_key: PublicKey::from(&server()),
        })
        .unwrap();
    assert_eq!(init.kind, "init_server_key");
    assert_eq!(init.sequence, 0);
    assert_eq!(init.prior_root, init.new_root);
    assert!(init.record.is_none());

    let cmd = add_worker_cmd(&engine, &key(1), 5);
    let added = engine.submit(cmd).unwrap();
    assert_eq!(added.sequence, 1);
    assert_eq!(added.prior_root, init.new_root);
    assert_eq!(added.new_root, engine.current_root());
    assert_eq!(added.leaf, Some(LeafIndex(5)));

    let cmd = punch_cmd(&engine, &key(1), 5, T1);
    let punched = engine.submit(cmd).unwrap();
    let record = punched.record.unwrap();
    assert_eq!(record.currently_working, WorkStatus::ClockedIn);
    assert_eq!(record.last_seen, T1);
    assert_eq!(engine.event_count(), 3);
}

#[test]
fn test_rejected_commands_leave_no_trace() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.log");
    let mut engine = Engine::new(&config(Some(path.clone()))).unwrap();
    run_session(&mut engine);

    let root = engine.current_root();
    let version = engine.version();
    let log_len = std::fs::metadata(&path).unwrap().len();

    // Replayed punch: same oracle time again.
    let mut cmd = punch_cmd(&engine, &key(1), 0, T3);
    let err = engine.submit(cmd.clone()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Ledger(LedgerError::NonMonotonicTime { last_seen: T3, new_time: T3 })
    ));

    // Server key is one-shot.
    let err = engine
        .submit(Command::InitServerKey {
            server_key: PublicKey::from(&key(9)),
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::Ledger(LedgerError::AlreadyInitialized)));

    // Cheating on worked hours.
    if let Command::PunchIn { worked_hours, .. } = &mut cmd {
        *worked_hours += 60_000;
    }
    assert!(engine.submit(cmd).is_err());

    assert_eq!(engine.current_root(), root);
    assert_eq!(engine.version(), version);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), log_len);
}

#[test]
fn test_crash_recovery_reproduces_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.log");

    let (root, version, proof, alice) = {
        let mut engine = Engine::new(&config(Some(path.clone()))).unwrap();
        run_session(&mut engine);
        (
            engine.current_root(),
            engine.version(),
            engine.proof(),
            engine.record(LeafIndex(0)).unwrap().unwrap(),
        )
    };
    assert_eq!(alice.worked_hours, T3 - T1);

    let mut engine = Engine::new(&config(Some(path.clone()))).unwrap();
    assert_eq!(engine.current_root(), root);
    assert_eq!(engine.version(), version);
    assert_eq!(engine.event_count(), 6);
    assert_eq!(engine.record(LeafIndex(0)).unwrap(), Some(alice));
    assert!(engine.proof().matches(&proof));

    // Keeps appending after recovery.
    let cmd = punch_cmd(&engine, &key(2), 77, T3);
    engine.submit(cmd).unwrap();
    assert_eq!(engine.event_count(), 7);
    assert_eq!(engine.record(LeafIndex(77)).unwrap().unwrap().worked_hours, T3 - T2);
}

#[test]
fn test_proof_matches_offline_replay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.log");
    let mut engine = Engine::new(&config(Some(path.clone()))).unwrap();
    run_session(&mut engine);

    let bytes = std::fs::read(&path).unwrap();
    let (ledger, _, count) = replay_log(PublicKey::from(&oracle()), &bytes).unwrap();
    let offline = punchclock_kernel::proof::LedgerProof::new(&bytes, ledger.current_root(), count, ledger.version());

    assert_eq!(engine.proof(), offline);
}

#[test]
fn test_in_memory_proof_matches_file_backed() {
    let dir = tempdir().unwrap();
    let mut on_disk = Engine::new(&config(Some(dir.path().join("events.log")))).unwrap();
    let mut in_memory = Engine::new(&config(None)).unwrap();
    run_session(&mut on_disk);
    run_session(&mut in_memory);

    assert_eq!(on_disk.proof(), in_memory.proof());
}

#[test]
fn test_corrupted_log_fails_closed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.log");
    {
        let mut engine = Engine::new(&config(Some(path.clone()))).unwrap();
        run_session(&mut engine);
    }

    let mut bytes = std::fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x55;
    std::fs::write(&path, &bytes).unwrap();

    assert!(matches!(Engine::new(&config(Some(path))), Err(EngineError::EventLog(_))));
}

#[test]
fn test_log_replayed_under_wrong_oracle_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.log");
    {
        let mut engine = Engine::new(&config(Some(path.clone()))).unwrap();
        run_session(&mut engine);
    }

    let cfg = NodeConfig {
        oracle_key: PublicKey::from(&key(201)),
        ..config(Some(path))
    };
    assert!(Engine::new(&cfg).is_err());
}

#[test]
fn test_stale_witness_retry() {
    let mut engine = Engine::new(&config(None)).unwrap();
    run_session(&mut engine);

    // Both built against the same root; only the first can land.
    let first = add_worker_cmd(&engine, &key(3), 10);
    let second = add_worker_cmd(&engine, &key(4), 11);
    engine.submit(first).unwrap();
    let err = engine.submit(second).unwrap_err();
    assert!(matches!(err, EngineError::Ledger(LedgerError::StaleRoot)));

    let retry = add_worker_cmd(&engine, &key(4), 11);
    engine.submit(retry).unwrap();
    assert!(engine.record(LeafIndex(11)).unwrap().is_some());
}
