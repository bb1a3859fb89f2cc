//! Fixed-interval driver for sync cycles.
//!
//! The scheduler owns no state of its own: on every tick it hands the shared
//! `Syncer` to a fresh worker thread and goes back to waiting, so a slow fetch
//! never delays the next tick. Ticks that land while a cycle is still running are
//! absorbed by the syncer's single-flight flag.
use crossbeam_channel::{Receiver, select, tick};
use log::{debug, error, info};

use crate::remote::RemoteSource;
use crate::storage::KeyValueStore;
use crate::sync::{SyncOutcome, Syncer};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Runs `Syncer::run_once` on a fixed interval until told to stop.
pub struct SyncScheduler;

impl SyncScheduler {
    /// Block the calling thread, starting a cycle immediately and then every `interval`.
    ///
    /// Returns when `shutdown_rx` yields or disconnects, after every worker started
    /// so far and every push they launched has finished.
    pub fn run<S, R>(syncer: Arc<Syncer<S, R>>, interval: Duration, shutdown_rx: Receiver<()>)
    where
        S: KeyValueStore + Send + 'static,
        R: RemoteSource + Send + Sync + 'static,
    {
        let ticker = tick(interval);
        let mut workers = vec![Self::spawn_cycle(Arc::clone(&syncer))];

        loop {
            select! {
                recv(shutdown_rx) -> _ => break,
                recv(ticker) -> _ => {
                    workers.retain(|worker| !worker.is_finished());
                    workers.push(Self::spawn_cycle(Arc::clone(&syncer)));
                }
            }
        }

        info!("Scheduler stopping, waiting for {} sync workers", workers.len());
        for worker in workers {
            if worker.join().is_err() {
                error!("Sync worker panicked during shutdown");
            }
        }
        syncer.wait_for_pushes();
    }

    fn spawn_cycle<S, R>(syncer: Arc<Syncer<S, R>>) -> JoinHandle<()>
    where
        S: KeyValueStore + Send + 'static,
        R: RemoteSource + Send + Sync + 'static,
    {
        thread::spawn(move || match syncer.run_once() {
            Ok(SyncOutcome::Skipped) => debug!("Previous sync still running"),
            Ok(outcome) => debug!("Sync cycle finished: {:?}", outcome),
            Err(e) => error!("Sync cycle failed: {}", e),
        })
    }
}
