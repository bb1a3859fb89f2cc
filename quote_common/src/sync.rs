//! One sync cycle: fetch server quotes, reconcile, persist, optionally push.
//!
//! `Syncer` is shared between the scheduler and the worker threads it spawns. A
//! single-flight flag makes a cycle started while another is still running return
//! `SyncOutcome::Skipped` straight away, so slow fetches never pile up or race on
//! the store.
//!
//! Failures are contained: a failed fetch ends the cycle with `NoChange`. The push
//! runs on a detached thread after the flag is released, so a slow or failing POST
//! never holds up the next cycle; its failure is only logged. Callers that are about
//! to exit use `wait_for_pushes` so the last push is not cut off.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use crate::quote::QuoteList;
use crate::remote::{RemoteSource, fetch_or_empty};
use crate::result::Result;
use crate::storage::KeyValueStore;
use crate::store::QuoteStore;

/// How server quotes are reconciled with the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Append server quotes whose text is not yet known locally.
    #[default]
    Merge,
    /// Replace the local list with the server list when the server returned anything.
    Overwrite,
}

/// Result of a single sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `added` server quotes were appended.
    Merged {
        /// Number of appended quotes.
        added: usize,
    },
    /// The local list was replaced by `count` server quotes.
    Replaced {
        /// Size of the new list.
        count: usize,
    },
    /// Nothing changed: no server data, or nothing new in it.
    NoChange,
    /// Another cycle was already running.
    Skipped,
}

/// Tuning for a `Syncer`.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Maximum number of server items taken per fetch.
    pub limit: usize,
    /// Reconciliation policy.
    pub mode: SyncMode,
    /// Push the local list back after each cycle.
    pub push: bool,
}

/// Runs sync cycles against a shared store, one at a time.
pub struct Syncer<S: KeyValueStore, R: RemoteSource> {
    store: Arc<Mutex<QuoteStore<S>>>,
    remote: Arc<R>,
    options: SyncOptions,
    in_flight: AtomicBool,
    pushes: Mutex<Vec<JoinHandle<()>>>,
}

/// Clears the in-flight flag when a cycle ends, including by early return.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S, R> Syncer<S, R>
where
    S: KeyValueStore,
    R: RemoteSource + Send + Sync + 'static,
{
    /// Create a syncer over `store` using `remote`.
    pub fn new(store: Arc<Mutex<QuoteStore<S>>>, remote: R, options: SyncOptions) -> Self {
        Self {
            store,
            remote: Arc::new(remote),
            options,
            in_flight: AtomicBool::new(false),
            pushes: Mutex::new(Vec::new()),
        }
    }

    /// Whether a cycle is currently running.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one fetch, reconcile and save cycle unless one is already running.
    pub fn run_once(&self) -> Result<SyncOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync already in progress, skipping this tick");
            return Ok(SyncOutcome::Skipped);
        }
        let (outcome, snapshot) = {
            let _guard = FlightGuard(&self.in_flight);
            let server = fetch_or_empty(self.remote.as_ref(), self.options.limit);
            self.reconcile(server)?
        };

        match outcome {
            SyncOutcome::Merged { added } => info!("Quotes synced with server: {} new", added),
            SyncOutcome::Replaced { count } => {
                info!("Local quotes replaced by {} server quotes", count)
            }
            _ => debug!("Sync finished without changes"),
        }

        if self.options.push {
            self.push_detached(snapshot);
        }
        Ok(outcome)
    }

    /// Block until every push started so far has finished.
    pub fn wait_for_pushes(&self) {
        let pending = match self.pushes.lock() {
            Ok(mut pushes) => std::mem::take(&mut *pushes),
            Err(e) => {
                error!("Push list lock poisoned: {}", e);
                return;
            }
        };
        for push in pending {
            if push.join().is_err() {
                error!("Push thread panicked");
            }
        }
    }

    fn push_detached(&self, snapshot: QuoteList) {
        let remote = Arc::clone(&self.remote);
        let handle = thread::spawn(move || match remote.push(&snapshot) {
            Ok(()) => debug!("Pushed {} quotes to server", snapshot.len()),
            Err(e) => warn!("Pushing quotes to server failed: {}", e),
        });
        match self.pushes.lock() {
            Ok(mut pushes) => {
                pushes.retain(|push| !push.is_finished());
                pushes.push(handle);
            }
            Err(e) => warn!("Push list lock poisoned, push left untracked: {}", e),
        }
    }

    fn reconcile(&self, server: QuoteList) -> Result<(SyncOutcome, QuoteList)> {
        let mut store = self.store.lock()?;
        let outcome = if server.is_empty() {
            SyncOutcome::NoChange
        } else {
            match self.options.mode {
                SyncMode::Merge => match store.merge_remote(&server)? {
                    0 => SyncOutcome::NoChange,
                    added => SyncOutcome::Merged { added },
                },
                SyncMode::Overwrite if store.quotes() == &server[..] => SyncOutcome::NoChange,
                SyncMode::Overwrite => {
                    let count = server.len();
                    store.replace_all(server)?;
                    SyncOutcome::Replaced { count }
                }
            }
        };
        Ok((outcome, store.quotes().to_vec()))
    }
}
