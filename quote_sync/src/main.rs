//! Quote sync daemon.
//!
//! Keeps the local quote store in step with the quote server. It wires together
//! three building blocks:
//!
//! - `QuoteStore` — the local list, backed by files in the data directory and
//!   shared behind a `Mutex`.
//! - `Syncer` — one fetch → merge → save cycle against the `RemoteClient`, guarded
//!   so overlapping cycles are skipped instead of raced.
//! - `SyncScheduler` — a `crossbeam_channel::tick` loop that starts a cycle on every
//!   interval until Ctrl+C is received.
//!
//! Network and parse failures are logged and the cycle is skipped; the daemon only
//! exits on Ctrl+C or when it cannot start at all.
//!
//! Usage example (CLI):
//! ```bash
//! quote_sync --data-dir ./quote_data --interval-secs 30 --push
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use quote_common::QuoteError;
use quote_common::QuoteStore;
use quote_common::Result;
use quote_common::remote::RemoteClient;
use quote_common::schedule::SyncScheduler;
use quote_common::storage::FileStore;
use quote_common::sync::Syncer;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let storage = FileStore::new(&args.data_dir);
    let store = Arc::new(Mutex::new(QuoteStore::open(storage)));
    info!(
        "Quote store opened at {:?} with {} quotes",
        args.data_dir,
        store.lock()?.len()
    );

    let remote = RemoteClient::new(args.endpoint.clone())?;
    let syncer = Arc::new(Syncer::new(Arc::clone(&store), remote, args.sync_options()));

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down sync daemon...");
        if let Err(e) = shutdown_tx.send(()) {
            error!("Error sending shutdown notification: {}", e);
        }
    })
    .map_err(|e| QuoteError::Signal(e.to_string()))?;

    info!(
        "Syncing with {} every {}s. Press Ctrl+C to exit.",
        args.endpoint, args.interval_secs
    );
    SyncScheduler::run(syncer, Duration::from_secs(args.interval_secs), shutdown_rx);

    let mut store = store.lock()?;
    store.save()?;
    info!("Saved {} quotes. Bye.", store.len());
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
