// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use punchclock_kernel::mirror::RecordStore;
use punchclock_kernel::proof::LedgerProof;
use punchclock_kernel::replay::replay_log;
use punchclock_kernel::types::{Digest, LeafIndex, PublicKey, Worker};
use serde::Serialize;

/// Replays a punchclock event log from genesis and prints a proof of the
/// root it ends at.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the event log (e.g. events.log)
    event_log: PathBuf,

    /// Oracle public key the ledger was started with (hex)
    #[arg(long)]
    oracle_key: String,

    /// Fail unless the replayed root equals this one (hex)
    #[arg(long)]
    expect_root: Option<String>,

    /// Include every worker record in the output
    #[arg(long)]
    records: bool,
}

#[derive(Serialize, Debug)]
struct Report {
    proof: LedgerProof,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<(LeafIndex, Worker)>>,
}

fn verify_log(log_bytes: &[u8], oracle_key: PublicKey, expect_root: Option<Digest>, records: bool) -> Result<Report> {
    let (ledger, mirror, event_count) =
        replay_log(oracle_key, log_bytes).map_err(|e| anyhow::anyhow!("Replay failed: {e}"))?;

    let final_root = ledger.current_root();
    if let Some(expected) = expect_root {
        if expected != final_root {
            anyhow::bail!("Root mismatch: log ends at {final_root}, expected {expected}");
        }
    }

    Ok(Report {
        proof: LedgerProof::new(log_bytes, final_root, event_count, ledger.version()),
        records: records.then(|| mirror.store().records()),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    eprintln!("punchclock verifier v{}", env!("CARGO_PKG_VERSION"));

    let oracle_key = PublicKey::from_hex(args.oracle_key.trim()).context("Invalid --oracle-key")?;
    let expect_root = args
        .expect_root
        .as_deref()
        .map(|s| Digest::from_hex(s.trim()))
        .transpose()
        .context("Invalid --expect-root")?;

    let log_bytes = fs::read(&args.event_log)
        .with_context(|| format!("Failed to read event log {:?}", args.event_log))?;

    let report = verify_log(&log_bytes, oracle_key, expect_root, args.records)?;

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);

    Ok(())
}
